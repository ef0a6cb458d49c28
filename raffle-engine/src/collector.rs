use raffle_core::{
    Comment, CommentSelectors, CommentSet, FieldRule, PageError, PageRenderer, RaffleConfig,
};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionStats {
    pub pages_visited: usize,
    pub records_seen: usize,
    pub records_discarded: usize,
    pub keyword_matches: usize,
}

pub struct CommentCollector<'a, R: PageRenderer> {
    renderer: &'a R,
    config: &'a RaffleConfig,
}

impl<'a, R: PageRenderer> CommentCollector<'a, R> {
    pub fn new(renderer: &'a R, config: &'a RaffleConfig) -> Self {
        Self { renderer, config }
    }

    fn selectors(&self) -> &CommentSelectors {
        &self.config.comments
    }

    fn field_rules(&self) -> Vec<FieldRule> {
        let selectors = self.selectors();
        vec![
            FieldRule::text(&selectors.author),
            FieldRule::text(&selectors.content),
            FieldRule::attribute(&selectors.profile_link, &selectors.profile_attribute),
        ]
    }

    /// Collects from the page the renderer currently shows. A wait timeout on
    /// any page aborts the whole collection.
    pub async fn collect(&self, keyword: &str) -> Result<(CommentSet, CollectionStats), PageError> {
        let selectors = self.selectors();
        let rules = self.field_rules();
        let wait = self.config.timing.pagination_wait();
        let settle = self.config.timing.page_settle();

        let mut comments = CommentSet::new();
        let mut stats = CollectionStats::default();
        let mut page = 1usize;

        loop {
            self.renderer
                .wait_for_presence(&selectors.comment_box, wait)
                .await?;
            stats.pages_visited += 1;

            let records = self
                .renderer
                .extract_all(&selectors.comment_box, &rules)
                .await?;
            stats.records_seen += records.len();

            for record in records {
                let comment = match (record.get(0), record.get(1), record.get(2)) {
                    (Some(author), Some(text), Some(href)) => self
                        .config
                        .resolve_profile_url(href)
                        .and_then(|url| Comment::from_parts(author, text, &url)),
                    _ => None,
                };

                let Some(comment) = comment else {
                    stats.records_discarded += 1;
                    continue;
                };

                if comment.mentions(keyword) {
                    stats.keyword_matches += 1;
                    if comments.insert(comment) {
                        debug!("Page {}: admitted new commenter", page);
                    }
                }
            }

            debug!(
                "Page {} done, {} unique commenters so far",
                page,
                comments.len()
            );

            if !self.advance(&mut page, settle).await? {
                break;
            }
        }

        info!(
            "Collected {} unique keyword commenters over {} page(s)",
            comments.len(),
            stats.pages_visited
        );
        Ok((comments, stats))
    }

    async fn advance(&self, page: &mut usize, settle: Duration) -> Result<bool, PageError> {
        let Some(current) = self
            .renderer
            .locate_active_control(&self.selectors().active_page)
            .await?
        else {
            debug!("No active pagination control, stopping after page {}", page);
            return Ok(false);
        };

        let next = self.renderer.locate_next_control(&current).await?;
        let Some(next) = next.filter(|control| control.is_page_advance()) else {
            debug!("No next page button after page {}", page);
            return Ok(false);
        };

        *page += 1;
        info!("Moving to comment page {} (button '{}')", page, next.label);
        self.renderer.activate(&next).await?;
        tokio::time::sleep(settle).await;
        Ok(true)
    }
}
