//! Paginated post list controller.
//!
//! Owns the current page window and keeps it consistent with the remote
//! paged collection. Overlapping loads are fenced with a monotonic
//! generation: a response that is no longer the latest issued request is
//! discarded instead of silently overwriting newer state.

use omnify_types::{PAGE_SIZE, PageWindow};

use crate::client::{ApiClient, Credential};
use crate::error::ApiResult;

/// Per-operation load state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// The paginated post list controller.
///
/// The window is replaced wholesale on every successful fetch; a delete
/// removes one item in place and leaves `total_pages` stale until the next
/// navigation. Nothing is cached across navigations.
#[derive(Debug, Default)]
pub struct Feed {
    window: Option<PageWindow>,
    state: LoadState,
    generation: u64,
}

impl Feed {
    pub fn new() -> Self {
        Feed::default()
    }

    pub fn window(&self) -> Option<&PageWindow> {
        self.window.as_ref()
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Marks a new load as the latest and returns its fence token.
    ///
    /// Any load begun earlier becomes stale: its completion will be
    /// discarded.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.state = LoadState::Loading;
        self.generation
    }

    /// Applies a fetched window if `generation` is still the latest issued.
    ///
    /// Returns whether the window was applied.
    pub fn complete_load(&mut self, generation: u64, window: PageWindow) -> bool {
        if generation != self.generation {
            tracing::debug!(generation, latest = self.generation, "discarding stale page");
            return false;
        }
        self.window = Some(window);
        self.state = LoadState::Loaded;
        true
    }

    /// Records a failed load. The prior window is kept. Older failures do
    /// not clobber the state of a newer load.
    pub fn fail_load(&mut self, generation: u64) {
        if generation == self.generation {
            self.state = LoadState::Errored;
        }
    }

    /// Fetches one page of size [`PAGE_SIZE`] and adopts it.
    ///
    /// On failure the window keeps its prior value.
    ///
    /// # Errors
    /// Surfaces the gateway error; the caller decides how to present it.
    pub async fn load_page(&mut self, client: &ApiClient, index: u32) -> ApiResult<&PageWindow> {
        let generation = self.begin_load();

        match client.fetch_page(index, PAGE_SIZE).await {
            Ok(page) => {
                self.complete_load(generation, PageWindow::from_remote(index, page));
                // complete_load only rejects stale generations; this one was
                // just issued under &mut self, so the window is present.
                Ok(self.window.as_ref().expect("window just applied"))
            }
            Err(err) => {
                self.fail_load(generation);
                Err(err)
            }
        }
    }

    /// Deletes a post remotely, then removes it from the current window.
    ///
    /// No refetch: the page may under-fill and `total_pages` stays stale
    /// until the next navigation. An id absent from the window leaves local
    /// state unchanged. On remote failure nothing local changes.
    pub async fn delete_post(
        &mut self,
        client: &ApiClient,
        cred: &Credential,
        id: &str,
    ) -> ApiResult<()> {
        client.delete_post(cred, id).await?;
        if let Some(window) = self.window.as_mut() {
            window.remove_post(id);
        }
        Ok(())
    }

    /// Index of the previous page, clamped at 0.
    pub fn prev_index(&self) -> u32 {
        self.window
            .as_ref()
            .map_or(0, |w| w.page_index.saturating_sub(1))
    }

    /// Index of the next page, clamped at `total_pages - 1`.
    pub fn next_index(&self) -> u32 {
        self.window.as_ref().map_or(0, |w| {
            let last = w.total_pages.saturating_sub(1);
            (w.page_index + 1).min(last)
        })
    }
}
