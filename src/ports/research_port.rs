//! Authenticated research site port trait (sign-in, curated lists, stock checkup).

use crate::domain::error::ScoutError;
use crate::domain::fundamentals::IbdCheckup;
use crate::domain::session::{Credentials, Session};
use crate::domain::stock_list::StockList;

pub trait ResearchPort {
    fn sign_in(&self, credentials: &Credentials) -> Result<Session, ScoutError>;

    /// Symbols of `list` in the order the site ranks them.
    fn fetch_list(&self, session: &Session, list: StockList) -> Result<Vec<String>, ScoutError>;

    fn fetch_checkup(&self, session: &Session, symbol: &str) -> Result<IbdCheckup, ScoutError>;
}
