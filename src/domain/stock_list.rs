//! IBD curated stock lists and the per-day list cache.

use crate::domain::error::ScoutError;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StockList {
    Ibd50,
    Canslim,
    SectorLeaders,
    Spotlight,
    BigCap,
    NewHigh,
    RelStrNewHighs,
    Funds,
    Ipos,
    Global,
    RisingProfits,
}

impl StockList {
    pub const ALL: [StockList; 11] = [
        StockList::Ibd50,
        StockList::Canslim,
        StockList::SectorLeaders,
        StockList::Spotlight,
        StockList::BigCap,
        StockList::NewHigh,
        StockList::RelStrNewHighs,
        StockList::Funds,
        StockList::Ipos,
        StockList::Global,
        StockList::RisingProfits,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StockList::Ibd50 => "ibd50",
            StockList::Canslim => "canslim",
            StockList::SectorLeaders => "sectorleaders",
            StockList::Spotlight => "spotlight",
            StockList::BigCap => "bigcap",
            StockList::NewHigh => "newhigh",
            StockList::RelStrNewHighs => "relstrnewhighs",
            StockList::Funds => "funds",
            StockList::Ipos => "ipos",
            StockList::Global => "global",
            StockList::RisingProfits => "risingprofits",
        }
    }

    /// Service method and sort order of the site's list endpoint.
    pub fn endpoint(&self) -> ListEndpoint {
        let (method, primary, primary_order, secondary, secondary_order) = match self {
            StockList::Ibd50 => ("GetIBD50", "ibd100rank", "asc", "", "ASC"),
            StockList::Canslim => ("GetCanslimSelect", "comprating", "desc", "symbol", "ASC"),
            StockList::SectorLeaders => ("GetSectorLeaders", "sectorrank", "asc", "symbol", "Asc"),
            StockList::Spotlight => ("GetStockSpotlight", "comprating", "desc", "", "ASC"),
            StockList::BigCap => ("GetBigCap20", "ibd100rank", "asc", "", "ASC"),
            StockList::NewHigh => ("GetNewHigh", "comprating", "desc", "symbol", "ASC"),
            StockList::RelStrNewHighs => ("GetBoltingRSLines", "rsrating", "desc", "symbol", "ASC"),
            StockList::Funds => ("GetAccelMFOwnership", "nofunds", "desc", "symbol", "ASC"),
            StockList::Ipos => ("GetIPOLeaders", "comprating", "desc", "symbol", "ASC"),
            StockList::Global => ("GetGlobalLeaders", "rank", "asc", "CompRating", "ASC"),
            StockList::RisingProfits => {
                ("GetLeadersRisingEstimates", "comprating", "desc", "symbol", "ASC")
            }
        };
        ListEndpoint {
            method,
            sort_column: primary,
            sort_order: primary_order,
            secondary_column: secondary,
            secondary_order,
        }
    }

    /// Expands CLI list names; `all` selects every list.
    pub fn parse_selection(names: &[String]) -> Result<Vec<StockList>, ScoutError> {
        if names.iter().any(|n| n.eq_ignore_ascii_case("all")) {
            return Ok(Self::ALL.to_vec());
        }
        let mut lists = Vec::with_capacity(names.len());
        for name in names {
            let list: StockList = name.parse()?;
            if !lists.contains(&list) {
                lists.push(list);
            }
        }
        Ok(lists)
    }
}

impl fmt::Display for StockList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StockList {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .find(|l| l.name() == wanted)
            .copied()
            .ok_or_else(|| ScoutError::UnknownList(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListEndpoint {
    pub method: &'static str,
    pub sort_column: &'static str,
    pub sort_order: &'static str,
    pub secondary_column: &'static str,
    pub secondary_order: &'static str,
}

impl ListEndpoint {
    /// Query string with JSON-quoted values, as the list service expects.
    pub fn query(&self) -> String {
        format!(
            "sortcolumn1=%22{}%22&sortOrder1=%22{}%22&sortcolumn2=%22{}%22&sortOrder2=%22{}%22",
            self.sort_column, self.sort_order, self.secondary_column, self.secondary_order
        )
    }
}

/// Memoises fetched lists per calendar day for one invocation.
#[derive(Debug, Default)]
pub struct ListCache {
    entries: HashMap<(StockList, NaiveDate), Vec<String>>,
}

impl ListCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, list: StockList, day: NaiveDate) -> Option<&[String]> {
        self.entries.get(&(list, day)).map(Vec::as_slice)
    }

    pub fn get_or_fetch<F>(
        &mut self,
        list: StockList,
        day: NaiveDate,
        fetch: F,
    ) -> Result<&[String], ScoutError>
    where
        F: FnOnce() -> Result<Vec<String>, ScoutError>,
    {
        let symbols = match self.entries.entry((list, day)) {
            std::collections::hash_map::Entry::Occupied(e) => e.into_mut(),
            std::collections::hash_map::Entry::Vacant(e) => e.insert(fetch()?),
        };
        Ok(symbols.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
