use raffle_core::{
    Comment, CommentSet, EligibleUser, ErrorExt, PageError, PageRenderer, RaffleConfig,
};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    Eligible { name: String, posts: u64 },
    BelowThreshold { name: String, posts: u64 },
    Skipped { name: String, reason: PageError },
}

impl CandidateOutcome {
    pub fn name(&self) -> &str {
        match self {
            CandidateOutcome::Eligible { name, .. }
            | CandidateOutcome::BelowThreshold { name, .. }
            | CandidateOutcome::Skipped { name, .. } => name,
        }
    }

    pub fn is_eligible(&self) -> bool {
        matches!(self, CandidateOutcome::Eligible { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, CandidateOutcome::Skipped { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct EligibilityReport {
    pub outcomes: Vec<CandidateOutcome>,
}

impl EligibilityReport {
    /// Eligible names in admission order, duplicates kept.
    pub fn eligible(&self) -> Vec<EligibleUser> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                CandidateOutcome::Eligible { name, .. } => Some(EligibleUser(name.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }
}

pub struct EligibilityFilter<'a, R: PageRenderer> {
    renderer: &'a R,
    config: &'a RaffleConfig,
}

impl<'a, R: PageRenderer> EligibilityFilter<'a, R> {
    pub fn new(renderer: &'a R, config: &'a RaffleConfig) -> Self {
        Self { renderer, config }
    }

    /// Visits candidates one at a time in insertion order. A failing profile
    /// never aborts the loop.
    pub async fn filter(&self, candidates: &CommentSet, min_posts: u64) -> EligibilityReport {
        let mut report = EligibilityReport::default();

        for comment in candidates {
            info!("Checking profile of {}", comment.author);
            let outcome = match self.post_count(comment).await {
                Ok(posts) if posts >= min_posts => {
                    info!("{} has {} posts", comment.author, posts);
                    CandidateOutcome::Eligible {
                        name: comment.author.clone(),
                        posts,
                    }
                }
                Ok(posts) => {
                    info!("{} has {} posts (below {})", comment.author, posts, min_posts);
                    CandidateOutcome::BelowThreshold {
                        name: comment.author.clone(),
                        posts,
                    }
                }
                Err(reason) => {
                    reason.log_warn();
                    warn!("Could not read profile of {}, skipping", comment.author);
                    CandidateOutcome::Skipped {
                        name: comment.author.clone(),
                        reason,
                    }
                }
            };
            report.outcomes.push(outcome);
        }

        info!(
            "{} of {} candidates eligible, {} skipped",
            report.outcomes.iter().filter(|o| o.is_eligible()).count(),
            report.outcomes.len(),
            report.skipped_count()
        );
        report
    }

    async fn post_count(&self, comment: &Comment) -> Result<u64, PageError> {
        let profile = &self.config.profile;
        self.renderer.navigate(&comment.profile_url).await?;
        self.renderer
            .wait_for_presence(&profile.stats_region, self.config.timing.profile_wait())
            .await?;
        self.renderer
            .read_statistic(profile, &profile.posts_label)
            .await
    }
}
