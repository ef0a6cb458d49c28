use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub text: String,
    pub profile_url: String,
}

impl Comment {
    pub fn from_parts(author: &str, text: &str, profile_url: &str) -> Option<Self> {
        let author = author.trim();
        let text = normalize_comment_text(text);
        let profile_url = profile_url.trim();

        if author.is_empty() || text.is_empty() || profile_url.is_empty() {
            return None;
        }

        Some(Self {
            author: author.to_string(),
            text,
            profile_url: profile_url.to_string(),
        })
    }

    pub fn mentions(&self, keyword: &str) -> bool {
        self.text.contains(keyword)
    }
}

pub fn normalize_comment_text(raw: &str) -> String {
    raw.replace('\n', " ").trim().to_string()
}

#[derive(Debug, Clone, Default)]
pub struct CommentSet {
    comments: Vec<Comment>,
    index: HashMap<String, usize>,
}

impl CommentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, comment: Comment) -> bool {
        if self.index.contains_key(&comment.author) {
            return false;
        }
        self.index.insert(comment.author.clone(), self.comments.len());
        self.comments.push(comment);
        true
    }

    pub fn get(&self, author: &str) -> Option<&Comment> {
        self.index.get(author).map(|&i| &self.comments[i])
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Comment> {
        self.comments.iter()
    }

    pub fn authors(&self) -> Vec<&str> {
        self.comments.iter().map(|c| c.author.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a CommentSet {
    type Item = &'a Comment;
    type IntoIter = std::slice::Iter<'a, Comment>;

    fn into_iter(self) -> Self::IntoIter {
        self.comments.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EligibleUser(pub String);

impl EligibleUser {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EligibleUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExclusionSet {
    names: HashSet<String>,
}

impl ExclusionSet {
    pub fn parse(raw: &str) -> Self {
        raw.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinnerList(pub Vec<EligibleUser>);

impl WinnerList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EligibleUser> {
        self.0.iter()
    }

    pub fn numbered_lines(&self) -> Vec<String> {
        self.0
            .iter()
            .enumerate()
            .map(|(i, winner)| format!("{}. {}", i + 1, winner))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct RaffleRequest {
    pub thread_url: String,
    pub keyword: String,
    pub winner_count: usize,
    pub min_posts: u64,
    pub exclusions: ExclusionSet,
}

impl RaffleRequest {
    pub fn from_answers(
        thread_url: &str,
        keyword: &str,
        winner_count: &str,
        min_posts: &str,
        exclusions: &str,
    ) -> Result<Self, ConfigError> {
        let thread_url = thread_url.trim();
        if thread_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "thread_url".to_string(),
            });
        }
        url::Url::parse(thread_url).map_err(|_| ConfigError::InvalidValue {
            field: "thread_url".to_string(),
            value: thread_url.to_string(),
        })?;

        let winner_count = match winner_count.trim().parse::<usize>() {
            Ok(count) if count >= 1 => count,
            _ => {
                return Err(ConfigError::InvalidValue {
                    field: "winner_count".to_string(),
                    value: winner_count.to_string(),
                })
            }
        };

        // A blank threshold admits everyone.
        let min_posts = match min_posts.trim() {
            "" => 0,
            raw => raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                field: "min_posts".to_string(),
                value: min_posts.to_string(),
            })?,
        };

        Ok(Self {
            thread_url: thread_url.to_string(),
            keyword: keyword.to_string(),
            winner_count,
            min_posts,
            exclusions: ExclusionSet::parse(exclusions),
        })
    }
}
