//! Locations of the two views and the state they carry.
//!
//! `/` (optionally `?key=..&direction=..`) is the all-funds table,
//! `/search`, `/search/{code}` and `/search?fonKodu=..` the detail view with
//! optional `startDate`/`endDate` bounds.

use crate::core::sort_state::SortState;
use anyhow::{Result, anyhow};
use percent_encoding::percent_decode_str;
use url::{Position, Url};

pub const CODE_PARAM: &str = "fonKodu";
pub const START_PARAM: &str = "startDate";
pub const END_PARAM: &str = "endDate";
const APP_BASE: &str = "app://fontakip/";

/// Detail view parameters; empty strings mean "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub fund_code: String,
    pub start_date: String,
    pub end_date: String,
}

impl SearchParams {
    /// Location of the detail view for these parameters.
    pub fn to_location(&self) -> Result<String> {
        let mut url = Url::parse(APP_BASE)?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow!("Base location cannot hold a path"))?;
            segments.clear().push("search");
            if !self.fund_code.is_empty() {
                segments.push(&self.fund_code);
            }
        }
        let bounds: Vec<(&str, &str)> = [
            (START_PARAM, self.start_date.as_str()),
            (END_PARAM, self.end_date.as_str()),
        ]
        .into_iter()
        .filter(|(_, v)| !v.is_empty())
        .collect();
        if !bounds.is_empty() {
            url.query_pairs_mut().extend_pairs(bounds);
        }
        Ok(url[Position::BeforePath..].to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    AllFunds { sort: SortState },
    Search { params: SearchParams },
}

impl Route {
    pub fn parse(location: &str) -> Result<Route> {
        let base = Url::parse(APP_BASE)?;
        let url = base
            .join(location)
            .map_err(|e| anyhow!("Invalid location '{}': {}", location, e))?;

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let query = |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        };

        let segments: Vec<String> = url
            .path_segments()
            .map(|s| {
                s.filter(|seg| !seg.is_empty())
                    .map(|seg| percent_decode_str(seg).decode_utf8_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();

        match segments.as_slice() {
            [] => Ok(Route::AllFunds {
                sort: SortState::from_query(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))),
            }),
            [search] | [search, _] if search == "search" => {
                let path_code = segments.get(1).cloned().unwrap_or_default();
                let query_code = query(CODE_PARAM);
                let fund_code = if query_code.is_empty() {
                    path_code
                } else {
                    query_code
                };
                Ok(Route::Search {
                    params: SearchParams {
                        fund_code,
                        start_date: query(START_PARAM),
                        end_date: query(END_PARAM),
                    },
                })
            }
            _ => Err(anyhow!("Unknown location: {}", location)),
        }
    }
}
