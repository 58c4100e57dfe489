//! Window control
//!
//! Maximize and close operations over the CDP browser domain.

use crate::error::{Error, Result};
use chromiumoxide::cdp::browser_protocol::browser::{
    Bounds, GetWindowForTargetParams, SetWindowBoundsParams, WindowState,
};
use chromiumoxide::cdp::browser_protocol::page::CloseParams;
use chromiumoxide::Page;
use tracing::{info, instrument};

/// Window-level operations on a page's containing browser window.
pub struct WindowControl;

impl WindowControl {
    /// Maximize the window containing this page.
    #[instrument(skip(page))]
    pub async fn maximize(page: &Page) -> Result<()> {
        info!("Maximizing browser window");

        let window = page
            .execute(GetWindowForTargetParams::default())
            .await
            .map_err(|e| Error::cdp(e.to_string()))?;

        let bounds = Bounds::builder().window_state(WindowState::Maximized).build();

        let params = SetWindowBoundsParams::builder()
            .window_id(window.window_id.clone())
            .bounds(bounds)
            .build()
            .map_err(Error::cdp)?;

        page.execute(params)
            .await
            .map_err(|e| Error::cdp(e.to_string()))?;

        Ok(())
    }

    /// Close the page's window.
    #[instrument(skip(page))]
    pub async fn close(page: &Page) -> Result<()> {
        info!("Closing window");

        page.execute(CloseParams::default())
            .await
            .map_err(|e| Error::cdp(e.to_string()))?;

        Ok(())
    }
}
