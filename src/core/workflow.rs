//! Detail view state: fetch by code and date range, edit one day, persist,
//! then refetch.
//!
//! Fetch and update each track their own [`OpState`]. Every fetch gets a
//! token and only the completion carrying the latest token is applied, so a
//! slow response cannot overwrite a newer one.

use crate::core::api::{FundQuery, FundsApi};
use crate::core::config::EditValidation;
use crate::core::edit::EditSession;
use crate::core::error::{ApiError, FundsError, MSG_EMPTY_CODE, MSG_UNEXPECTED_RESPONSE};
use crate::core::fund::DayReturns;
use crate::core::route::SearchParams;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum OpState {
    #[default]
    Idle,
    Loading,
    Success,
    Error(FundsError),
}

impl OpState {
    pub fn error(&self) -> Option<&FundsError> {
        match self {
            OpState::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, OpState::Loading)
    }
}

/// Handle for an issued fetch; pass it back to [`FundSearch::complete_fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    token: u64,
    pub query: FundQuery,
}

#[derive(Debug, Default)]
pub struct FundSearch {
    pub fund_code: String,
    pub start_date: String,
    pub end_date: String,
    pub fund_info: Option<Vec<DayReturns>>,
    pub fetch_state: OpState,
    pub edit: Option<EditSession>,
    pub update_state: OpState,
    validation: EditValidation,
    latest_token: u64,
}

impl FundSearch {
    pub fn new(validation: EditValidation) -> Self {
        Self {
            validation,
            ..Default::default()
        }
    }

    /// Mirrors the location into the form fields, touching only fields that
    /// differ. Returns the fetch to run, or `None` after a reset when the
    /// location carries no fund code. A reset also invalidates any fetch in
    /// flight.
    pub fn sync_from_route(&mut self, params: &SearchParams) -> Option<FundQuery> {
        if params.fund_code.is_empty() {
            debug!("No fund code in location, resetting search state");
            self.latest_token += 1;
            self.fund_code.clear();
            self.start_date.clear();
            self.end_date.clear();
            self.fund_info = None;
            self.fetch_state = OpState::Idle;
            return None;
        }

        for (field, value) in [
            (&mut self.fund_code, &params.fund_code),
            (&mut self.start_date, &params.start_date),
            (&mut self.end_date, &params.end_date),
        ] {
            if field != value {
                field.clone_from(value);
            }
        }

        Some(FundQuery::new(
            &params.fund_code,
            &params.start_date,
            &params.end_date,
        ))
    }

    /// Validates the form and returns the location to navigate to.
    /// The code is trimmed; a blank code fails locally without any request.
    pub fn search(&mut self) -> Result<String, FundsError> {
        let fund_code = self.fund_code.trim();
        if fund_code.is_empty() {
            let err = FundsError::Validation(MSG_EMPTY_CODE.to_string());
            self.fetch_state = OpState::Error(err.clone());
            return Err(err);
        }
        let params = SearchParams {
            fund_code: fund_code.to_string(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        };
        params
            .to_location()
            .map_err(|e| FundsError::Validation(e.to_string()))
    }

    /// Starts a fetch: marks loading and drops the displayed data.
    pub fn begin_fetch(&mut self, query: FundQuery) -> FetchTicket {
        self.latest_token += 1;
        self.fetch_state = OpState::Loading;
        self.fund_info = None;
        debug!(token = self.latest_token, ?query, "Fetch started");
        FetchTicket {
            token: self.latest_token,
            query,
        }
    }

    /// Applies a fetch result. Returns false if a newer fetch was issued
    /// in the meantime and the result was discarded.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<DayReturns>, ApiError>,
    ) -> bool {
        if ticket.token != self.latest_token {
            warn!(
                token = ticket.token,
                latest = self.latest_token,
                "Discarding stale fetch response"
            );
            return false;
        }

        match result {
            Ok(days) if !days.is_empty() => {
                debug!(days = days.len(), "Fetch succeeded");
                self.fund_info = Some(days);
                self.fetch_state = OpState::Success;
            }
            Ok(_) => {
                self.fund_info = None;
                self.fetch_state = OpState::Error(FundsError::NotFoundOrEmpty(
                    MSG_UNEXPECTED_RESPONSE.to_string(),
                ));
            }
            Err(e) => {
                error!(error = %e, fund = %ticket.query.fund_code, "Fetch failed");
                self.fund_info = None;
                self.fetch_state = OpState::Error(FundsError::from_fetch(&e));
            }
        }
        true
    }

    pub async fn fetch(&mut self, api: &dyn FundsApi, query: FundQuery) {
        let ticket = self.begin_fetch(query);
        let result = api.fund_history(&ticket.query).await;
        self.complete_fetch(ticket, result);
    }

    /// Syncs with a location and runs the resulting fetch, if any.
    pub async fn navigate(&mut self, api: &dyn FundsApi, params: &SearchParams) {
        if let Some(query) = self.sync_from_route(params) {
            self.fetch(api, query).await;
        }
    }

    /// Opens an edit session on the displayed day at `index`, discarding any
    /// unsaved session.
    pub fn open_edit(&mut self, index: usize) -> bool {
        let Some(day) = self.fund_info.as_ref().and_then(|days| days.get(index)) else {
            return false;
        };
        if self.edit.is_some() {
            debug!("Discarding unsaved edit session");
        }
        self.edit = Some(EditSession::open(day));
        self.update_state = OpState::Idle;
        true
    }

    pub fn open_edit_for_date(&mut self, date: &str) -> bool {
        let index = self
            .fund_info
            .as_ref()
            .and_then(|days| days.iter().position(|d| d.date == date));
        index.is_some_and(|i| self.open_edit(i))
    }

    pub fn edit_value(&mut self, description: &str, input: &str) -> bool {
        self.edit
            .as_mut()
            .is_some_and(|session| session.set_value(description, input))
    }

    /// Closes the session without any request.
    pub fn cancel_edit(&mut self) {
        self.edit = None;
        self.update_state = OpState::Idle;
    }

    /// Persists the open session, then refetches the current query and
    /// closes the session. On failure the session stays open untouched.
    pub async fn save(&mut self, api: &dyn FundsApi) -> Result<(), FundsError> {
        let Some(session) = self.edit.as_ref() else {
            return Ok(());
        };

        let payload = match session.payload(self.validation) {
            Ok(payload) => payload,
            Err(e) => {
                self.update_state = OpState::Error(e.clone());
                return Err(e);
            }
        };
        let fund_code = session.fund_code.clone();
        let date = session.date.clone();
        let target = api.update_target(&fund_code, &date);

        self.update_state = OpState::Loading;
        debug!(%target, entries = payload.len(), "Updating returns");

        match api.update_returns(&fund_code, &date, &payload).await {
            Ok(()) => {
                info!(fund = %fund_code, %date, "Returns updated");
                let query = FundQuery::new(&self.fund_code, &self.start_date, &self.end_date);
                self.fetch(api, query).await;
                self.edit = None;
                self.update_state = OpState::Success;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, %target, "Update failed");
                let err = FundsError::from_update(&e, &target);
                self.update_state = OpState::Error(err.clone());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::edit::EditValue;
    use crate::core::fund::ReturnEntry;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn day(date: &str, daily: f64) -> DayReturns {
        DayReturns {
            fund_code: "TTE".to_string(),
            long_name: "Teknoloji Fonu".to_string(),
            fund_desc: Some("Açıklama".to_string()),
            date: date.to_string(),
            returns: vec![
                ReturnEntry::new("Günlük Getiri", Some(daily)),
                ReturnEntry::new("Aylık Getiri", Some(-2.0)),
            ],
        }
    }

    #[derive(Default)]
    struct MockApi {
        history: Mutex<Vec<DayReturns>>,
        fail_update: bool,
        history_calls: Mutex<Vec<FundQuery>>,
        updates: Mutex<Vec<(String, String, Vec<ReturnEntry>)>>,
    }

    #[async_trait]
    impl FundsApi for MockApi {
        async fn list_funds(&self) -> Result<Vec<crate::core::fund::Fund>, ApiError> {
            Ok(Vec::new())
        }

        async fn fund_history(&self, query: &FundQuery) -> Result<Vec<DayReturns>, ApiError> {
            self.history_calls.lock().unwrap().push(query.clone());
            Ok(self.history.lock().unwrap().clone())
        }

        async fn update_returns(
            &self,
            fund_code: &str,
            date: &str,
            returns: &[ReturnEntry],
        ) -> Result<(), ApiError> {
            self.updates.lock().unwrap().push((
                fund_code.to_string(),
                date.to_string(),
                returns.to_vec(),
            ));
            if self.fail_update {
                Err(ApiError::Status {
                    status: 500,
                    body: String::new(),
                })
            } else {
                Ok(())
            }
        }

        fn update_target(&self, fund_code: &str, date: &str) -> String {
            format!("http://mock/api/funds/{fund_code}?date={date}")
        }
    }

    fn params(code: &str, start: &str, end: &str) -> SearchParams {
        SearchParams {
            fund_code: code.to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
        }
    }

    #[test]
    fn test_empty_code_fails_validation() {
        let mut search = FundSearch::new(EditValidation::Permissive);
        let err = search.search().unwrap_err();
        assert_eq!(err, FundsError::Validation(MSG_EMPTY_CODE.to_string()));
        assert_eq!(search.fetch_state.error(), Some(&err));
    }

    #[test]
    fn test_search_builds_location() {
        let mut search = FundSearch::new(EditValidation::Permissive);
        search.fund_code = "TTE".to_string();
        search.end_date = "2024-01-31".to_string();
        assert_eq!(search.search().unwrap(), "/search/TTE?endDate=2024-01-31");
    }

    #[test]
    fn test_search_trims_code() {
        let mut search = FundSearch::new(EditValidation::Permissive);
        search.fund_code = " TTE ".to_string();
        assert_eq!(search.search().unwrap(), "/search/TTE");

        search.fund_code = "   ".to_string();
        assert_eq!(
            search.search().unwrap_err(),
            FundsError::Validation(MSG_EMPTY_CODE.to_string())
        );
    }

    #[test]
    fn test_sync_without_code_resets() {
        let mut search = FundSearch::new(EditValidation::Permissive);
        search.fund_code = "TTE".to_string();
        search.start_date = "2024-01-01".to_string();
        search.fund_info = Some(vec![day("2024-01-05", 1.0)]);
        search.fetch_state = OpState::Error(FundsError::Validation("x".to_string()));

        assert!(search.sync_from_route(&SearchParams::default()).is_none());
        assert!(search.fund_code.is_empty());
        assert!(search.start_date.is_empty());
        assert!(search.fund_info.is_none());
        assert_eq!(search.fetch_state, OpState::Idle);
    }

    #[test]
    fn test_reset_discards_fetch_in_flight() {
        let mut search = FundSearch::new(EditValidation::Permissive);
        let query = search.sync_from_route(&params("TTE", "", "")).unwrap();
        let ticket = search.begin_fetch(query);

        assert!(search.sync_from_route(&SearchParams::default()).is_none());
        assert!(!search.complete_fetch(ticket, Ok(vec![day("2024-01-05", 1.0)])));
        assert!(search.fund_code.is_empty());
        assert!(search.fund_info.is_none());
        assert_eq!(search.fetch_state, OpState::Idle);
    }

    #[test]
    fn test_sync_copies_route_fields() {
        let mut search = FundSearch::new(EditValidation::Permissive);
        let query = search
            .sync_from_route(&params("TTE", "2024-01-01", ""))
            .unwrap();
        assert_eq!(query, FundQuery::new("TTE", "2024-01-01", ""));
        assert_eq!(search.fund_code, "TTE");
        assert_eq!(search.start_date, "2024-01-01");
        assert!(search.end_date.is_empty());
    }

    #[test]
    fn test_empty_list_is_an_error() {
        let mut search = FundSearch::new(EditValidation::Permissive);
        let ticket = search.begin_fetch(FundQuery::new("TTE", "", ""));
        assert!(search.fetch_state.is_loading());

        assert!(search.complete_fetch(ticket, Ok(Vec::new())));
        assert_eq!(
            search.fetch_state,
            OpState::Error(FundsError::NotFoundOrEmpty(
                MSG_UNEXPECTED_RESPONSE.to_string()
            ))
        );
        assert!(search.fund_info.is_none());
    }

    #[test]
    fn test_failed_fetch_clears_data() {
        let mut search = FundSearch::new(EditValidation::Permissive);
        let ticket = search.begin_fetch(FundQuery::new("TTE", "", ""));
        search.complete_fetch(ticket, Ok(vec![day("2024-01-05", 1.0)]));
        assert!(search.fund_info.is_some());

        let ticket = search.begin_fetch(FundQuery::new("XXX", "", ""));
        let result = Err(ApiError::Status {
            status: 404,
            body: "Fon yok".to_string(),
        });
        search.complete_fetch(ticket, result);
        assert!(search.fund_info.is_none());
        assert_eq!(
            search.fetch_state.error().map(ToString::to_string),
            Some("API isteği sırasında bir hata oluştu: Fon yok".to_string())
        );
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut search = FundSearch::new(EditValidation::Permissive);
        let slow = search.begin_fetch(FundQuery::new("AAA", "", ""));
        let fast = search.begin_fetch(FundQuery::new("TTE", "", ""));

        assert!(search.complete_fetch(fast, Ok(vec![day("2024-01-05", 1.0)])));
        assert!(!search.complete_fetch(slow, Ok(vec![day("2023-01-01", 9.0)])));

        let days = search.fund_info.as_ref().unwrap();
        assert_eq!(days[0].date, "2024-01-05");
        assert_eq!(search.fetch_state, OpState::Success);
    }

    #[tokio::test]
    async fn test_successful_update_refetches_once_and_closes() {
        let api = MockApi::default();
        *api.history.lock().unwrap() = vec![day("2024-01-05", 1.0), day("2024-01-04", 0.5)];

        let mut search = FundSearch::new(EditValidation::Permissive);
        search
            .navigate(&api, &params("TTE", "2024-01-01", "2024-01-31"))
            .await;
        assert_eq!(search.fetch_state, OpState::Success);

        assert!(search.open_edit_for_date("2024-01-05"));
        assert!(search.edit_value("Günlük Getiri", "1.75"));

        *api.history.lock().unwrap() = vec![day("2024-01-05", 1.75), day("2024-01-04", 0.5)];
        search.save(&api).await.unwrap();

        let calls = api.history_calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], FundQuery::new("TTE", "2024-01-01", "2024-01-31"));

        let updates = api.updates.lock().unwrap().clone();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, "TTE");
        assert_eq!(updates[0].1, "2024-01-05");
        assert_eq!(updates[0].2[0], ReturnEntry::new("Günlük Getiri", Some(1.75)));

        assert!(search.edit.is_none());
        assert_eq!(search.update_state, OpState::Success);
        assert_eq!(
            search.fund_info.as_ref().unwrap()[0].returns[0].value,
            Some(1.75)
        );
    }

    #[tokio::test]
    async fn test_failed_update_keeps_session() {
        let api = MockApi {
            fail_update: true,
            ..Default::default()
        };
        *api.history.lock().unwrap() = vec![day("2024-01-05", 1.0)];

        let mut search = FundSearch::new(EditValidation::Permissive);
        search.navigate(&api, &params("TTE", "", "")).await;
        assert!(search.open_edit(0));
        search.edit_value("Günlük Getiri", "abc");

        let err = search.save(&api).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Güncelleme işlemi başarısız oldu."));
        assert!(message.contains("http://mock/api/funds/TTE?date=2024-01-05"));

        let session = search.edit.as_ref().unwrap();
        assert_eq!(
            session.entries[0].value,
            EditValue::Invalid("abc".to_string())
        );
        assert_eq!(search.update_state, OpState::Error(err));
        // No refetch after a failed write
        assert_eq!(api.history_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_strict_validation_blocks_write() {
        let api = MockApi::default();
        *api.history.lock().unwrap() = vec![day("2024-01-05", 1.0)];

        let mut search = FundSearch::new(EditValidation::Strict);
        search.navigate(&api, &params("TTE", "", "")).await;
        search.open_edit(0);
        search.edit_value("Aylık Getiri", "x");

        assert!(matches!(
            search.save(&api).await,
            Err(FundsError::Validation(_))
        ));
        assert!(api.updates.lock().unwrap().is_empty());
        assert!(search.edit.is_some());
    }

    #[tokio::test]
    async fn test_cancel_discards_session_without_requests() {
        let api = MockApi::default();
        *api.history.lock().unwrap() = vec![day("2024-01-05", 1.0)];

        let mut search = FundSearch::new(EditValidation::Permissive);
        search.navigate(&api, &params("TTE", "", "")).await;
        search.open_edit(0);
        search.update_state = OpState::Error(FundsError::Validation("x".to_string()));

        search.cancel_edit();
        assert!(search.edit.is_none());
        assert_eq!(search.update_state, OpState::Idle);
        assert!(api.updates.lock().unwrap().is_empty());
        assert_eq!(api.history_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_opening_new_session_discards_previous() {
        let api = MockApi::default();
        *api.history.lock().unwrap() = vec![day("2024-01-05", 1.0), day("2024-01-04", 0.5)];

        let mut search = FundSearch::new(EditValidation::Permissive);
        search.navigate(&api, &params("TTE", "", "")).await;
        search.open_edit(0);
        search.edit_value("Günlük Getiri", "9");

        assert!(search.open_edit(1));
        let session = search.edit.as_ref().unwrap();
        assert_eq!(session.date, "2024-01-04");
        assert_eq!(session.entries[0].value, EditValue::Number(0.5));

        assert!(!search.open_edit(5));
    }
}
