//! Market Pulse image port trait.

use crate::domain::error::ScoutError;

pub trait PulsePort {
    /// Image bytes when the URL answers 200, `None` for any other status.
    fn fetch_image(&self, url: &str) -> Result<Option<Vec<u8>>, ScoutError>;
}
