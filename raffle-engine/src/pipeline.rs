use crate::collector::{CollectionStats, CommentCollector};
use crate::eligibility::{EligibilityFilter, EligibilityReport};
use crate::sampler::draw_winners;
use raffle_core::{
    CommentSet, CoreError, DrawError, PageRenderer, RaffleConfig, RaffleRequest, WinnerList,
};
use tracing::info;

#[derive(Debug)]
pub struct RaffleReport {
    pub comments: CommentSet,
    pub collection: CollectionStats,
    pub eligibility: EligibilityReport,
    pub draw: Result<WinnerList, DrawError>,
}

impl RaffleReport {
    pub fn winners(&self) -> Option<&WinnerList> {
        self.draw.as_ref().ok()
    }
}

pub struct RafflePipeline<'a, R: PageRenderer> {
    renderer: &'a R,
    config: &'a RaffleConfig,
}

impl<'a, R: PageRenderer> RafflePipeline<'a, R> {
    pub fn new(renderer: &'a R, config: &'a RaffleConfig) -> Self {
        Self { renderer, config }
    }

    /// Page failures outside the per-candidate profile checks abort the run.
    /// An insufficient pool is reported in [`RaffleReport::draw`].
    pub async fn run(
        &self,
        request: &RaffleRequest,
        rng: &mut fastrand::Rng,
    ) -> Result<RaffleReport, CoreError> {
        self.open_thread(&request.thread_url).await?;

        let (comments, collection) = CommentCollector::new(self.renderer, self.config)
            .collect(&request.keyword)
            .await?;
        info!(
            "Comments containing '{}': {} unique commenter(s)",
            request.keyword,
            comments.len()
        );

        let eligibility = EligibilityFilter::new(self.renderer, self.config)
            .filter(&comments, request.min_posts)
            .await;

        let draw = draw_winners(
            &eligibility.eligible(),
            &request.exclusions,
            request.winner_count,
            rng,
        );

        Ok(RaffleReport {
            comments,
            collection,
            eligibility,
            draw,
        })
    }

    async fn open_thread(&self, thread_url: &str) -> Result<(), CoreError> {
        info!("Opening thread {}", thread_url);
        self.renderer.navigate(thread_url).await?;
        let frame = self.config.site.frame_selector.as_deref().map(str::trim);
        if let Some(frame) = frame.filter(|f| !f.is_empty()) {
            self.renderer
                .enter_frame(frame, self.config.timing.pagination_wait())
                .await?;
        }
        Ok(())
    }
}
