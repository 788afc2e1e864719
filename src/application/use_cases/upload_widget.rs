use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::application::use_cases::transfer::TransferUseCase;
use crate::application::use_cases::validation::{
    validate, validate_columns, MISSING_COLUMNS_MESSAGE,
};
use crate::domain::error::{AppError, Result};
use crate::domain::submission::{
    StatusMessage, SubmissionResult, DOWNLOAD_FILE_NAME, GENERIC_FAILURE_MESSAGE, SUCCESS_MESSAGE,
};
use crate::domain::ui_state::UiState;
use crate::domain::upload::{FileCandidate, PendingSelection, RejectionReason};
use crate::infrastructure::downloads::DownloadSink;
use crate::interfaces::view::WidgetView;

/// Controller behind the upload form. One method per user action.
///
/// Handlers take `&mut self`, so at most one submission can be in flight.
pub struct UploadWidget<V: WidgetView> {
    transfer: TransferUseCase,
    downloads: Arc<dyn DownloadSink + Send + Sync>,
    view: V,
    selection: PendingSelection,
    state: UiState,
    download_delay: Duration,
}

impl<V: WidgetView> UploadWidget<V> {
    pub fn new(
        transfer: TransferUseCase,
        downloads: Arc<dyn DownloadSink + Send + Sync>,
        view: V,
        download_delay: Duration,
    ) -> Self {
        let mut widget = Self {
            transfer,
            downloads,
            view,
            selection: PendingSelection::default(),
            state: UiState::default(),
            download_delay,
        };
        widget.render();
        widget
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn selection(&self) -> &PendingSelection {
        &self.selection
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn source_column(&self) -> &str {
        self.selection.source_column()
    }

    pub fn dest_column(&self) -> &str {
        self.selection.dest_column()
    }

    pub fn on_file_chosen(&mut self, candidate: Option<FileCandidate>) {
        self.handle_file(candidate);
    }

    pub fn on_drag_enter(&mut self) {
        self.state.drag_entered();
        self.render();
    }

    pub fn on_drag_leave(&mut self) {
        self.state.drag_left();
        self.render();
    }

    pub fn on_drop(&mut self, candidate: Option<FileCandidate>) {
        self.state.drag_left();
        self.handle_file(candidate);
    }

    pub fn on_source_column_changed(&mut self, value: impl Into<String>) {
        self.selection.source_column = value.into();
    }

    pub fn on_dest_column_changed(&mut self, value: impl Into<String>) {
        self.selection.dest_column = value.into();
    }

    /// A rejected candidate leaves the previously accepted file in place.
    pub fn handle_file(&mut self, candidate: Option<FileCandidate>) {
        self.state.clear_message();

        match validate(candidate) {
            Ok(file) => {
                info!(file = %file.name(), bytes = file.bytes().len(), "CSV file selected");
                self.state.file_accepted(file.name());
                self.selection.file = Some(file);
            }
            Err(reason) => {
                debug!(reason = %reason, "File rejected");
                self.state
                    .show_message(StatusMessage::error(RejectionReason::USER_MESSAGE));
            }
        }

        self.render();
    }

    pub async fn on_submit_clicked(&mut self) {
        if !self.state.is_submit_enabled() || self.selection.file.is_none() {
            debug!(
                loading = self.state.is_loading(),
                "Submit ignored: control is disabled"
            );
            return;
        }

        self.state.clear_message();

        let (source, dest) = match validate_columns(
            &self.selection.source_column,
            &self.selection.dest_column,
        ) {
            Ok(columns) => columns,
            Err(err) => {
                let text = match err {
                    AppError::ValidationError(msg) => msg,
                    _ => MISSING_COLUMNS_MESSAGE.to_string(),
                };
                self.state.show_message(StatusMessage::error(text));
                self.render();
                return;
            }
        };

        self.state.begin_submission();
        self.render();

        let outcome = match self.selection.file.as_ref() {
            Some(file) => self.transfer.submit(file, &source, &dest).await,
            None => Err(AppError::ValidationError(
                RejectionReason::USER_MESSAGE.to_string(),
            )),
        };
        let download = self.present(outcome);

        self.state.end_submission();
        self.render();

        if let Some(bytes) = download {
            self.deliver(bytes).await;
        }
    }

    /// Updates the message for an outcome and hands back file bytes to deliver.
    fn present(&mut self, outcome: Result<SubmissionResult>) -> Option<Vec<u8>> {
        match outcome {
            Ok(SubmissionResult::Message(message)) => {
                info!(severity = %message.severity, "Service returned a status message");
                self.state.show_message(message);
                None
            }
            Ok(SubmissionResult::DownloadableFile(bytes)) => {
                self.state.show_message(StatusMessage::success(SUCCESS_MESSAGE));
                Some(bytes)
            }
            Err(err) => {
                warn!(error = %err, "Submission failed");
                self.state
                    .show_message(StatusMessage::error(GENERIC_FAILURE_MESSAGE));
                None
            }
        }
    }

    async fn deliver(&mut self, bytes: Vec<u8>) {
        if !self.download_delay.is_zero() {
            tokio::time::sleep(self.download_delay).await;
        }

        match self.downloads.save(DOWNLOAD_FILE_NAME, &bytes).await {
            Ok(path) => debug!(path = %path.display(), "Processed CSV delivered"),
            Err(err) => {
                error!(error = %err, "Failed to save processed CSV");
                self.state
                    .show_message(StatusMessage::error(GENERIC_FAILURE_MESSAGE));
                self.render();
            }
        }
    }

    fn render(&mut self) {
        self.view.render(&self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::submission::{ServiceReply, Severity};
    use crate::domain::upload::UploadRequest;
    use crate::infrastructure::http_client::ProcessingClient;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingView {
        frames: Vec<UiState>,
    }

    impl WidgetView for RecordingView {
        fn render(&mut self, state: &UiState) {
            self.frames.push(state.clone());
        }
    }

    struct ScriptedClient {
        replies: Mutex<VecDeque<Result<ServiceReply>>>,
        requests: Mutex<Vec<UploadRequest>>,
    }

    impl ScriptedClient {
        fn with(replies: Vec<Result<ServiceReply>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ProcessingClient for ScriptedClient {
        async fn upload(&self, request: &UploadRequest) -> Result<ServiceReply> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AppError::TransportError("no reply scripted".into())))
        }
    }

    #[derive(Default)]
    struct MemoryDownloads {
        saved: Mutex<Vec<(String, Vec<u8>)>>,
    }

    #[async_trait]
    impl DownloadSink for MemoryDownloads {
        async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
            self.saved
                .lock()
                .unwrap()
                .push((file_name.to_string(), bytes.to_vec()));
            Ok(PathBuf::from(file_name))
        }
    }

    struct BrokenDownloads;

    #[async_trait]
    impl DownloadSink for BrokenDownloads {
        async fn save(&self, _file_name: &str, _bytes: &[u8]) -> Result<PathBuf> {
            Err(AppError::IoError("disk full".to_string()))
        }
    }

    fn json_reply(status: u16, body: &str) -> Result<ServiceReply> {
        Ok(ServiceReply {
            status,
            content_type: Some("application/json".to_string()),
            body: body.as_bytes().to_vec(),
        })
    }

    fn csv_reply(body: &[u8]) -> Result<ServiceReply> {
        Ok(ServiceReply {
            status: 200,
            content_type: Some("text/csv; charset=utf-8".to_string()),
            body: body.to_vec(),
        })
    }

    fn widget_with(
        client: Arc<ScriptedClient>,
        downloads: Arc<dyn DownloadSink + Send + Sync>,
    ) -> UploadWidget<RecordingView> {
        UploadWidget::new(
            TransferUseCase::new(client),
            downloads,
            RecordingView::default(),
            Duration::ZERO,
        )
    }

    fn idle_widget() -> UploadWidget<RecordingView> {
        widget_with(
            ScriptedClient::with(vec![]),
            Arc::new(MemoryDownloads::default()),
        )
    }

    fn ready_widget(
        client: Arc<ScriptedClient>,
        downloads: Arc<dyn DownloadSink + Send + Sync>,
    ) -> UploadWidget<RecordingView> {
        let mut widget = widget_with(client, downloads);
        widget.on_file_chosen(Some(FileCandidate::new("reviews.csv", b"review\nGreat\n".to_vec())));
        widget.on_source_column_changed(" review ");
        widget.on_dest_column_changed("sentiment");
        widget
    }

    #[test]
    fn test_picker_accepts_csv_and_enables_submit() {
        let mut widget = idle_widget();
        assert!(!widget.state().is_submit_enabled());

        widget.on_file_chosen(Some(FileCandidate::new("Leads.CSV ", Vec::new())));
        assert!(widget.state().is_submit_enabled());
        assert_eq!(widget.state().selected_file_label(), Some("Selected file: Leads.CSV "));
        assert!(widget.state().message().is_none());
    }

    #[test]
    fn test_rejection_keeps_previous_file() {
        let mut widget = idle_widget();
        widget.on_file_chosen(Some(FileCandidate::new("good.csv", Vec::new())));
        widget.on_drop(Some(FileCandidate::new("notes.txt", Vec::new())));

        assert_eq!(
            widget.state().message(),
            Some(&StatusMessage::error("Please upload a valid .csv file"))
        );
        assert_eq!(widget.selection().file.as_ref().map(|f| f.name()), Some("good.csv"));
        assert!(widget.state().is_submit_enabled());
    }

    #[test]
    fn test_rejection_without_prior_file_keeps_submit_disabled() {
        let mut widget = idle_widget();
        widget.on_file_chosen(None);
        assert!(!widget.state().is_submit_enabled());
        assert_eq!(widget.state().message().map(|m| m.severity), Some(Severity::Error));
    }

    #[test]
    fn test_drag_highlight_cleared_on_drop() {
        let mut widget = idle_widget();
        widget.on_drag_enter();
        assert!(widget.state().is_drag_over());
        widget.on_drop(Some(FileCandidate::new("dropped.csv", Vec::new())));
        assert!(!widget.state().is_drag_over());
        assert!(widget.state().is_submit_enabled());

        widget.on_drag_enter();
        widget.on_drag_leave();
        assert!(!widget.state().is_drag_over());
    }

    #[test]
    fn test_column_getters_trim() {
        let widget = ready_widget(
            ScriptedClient::with(vec![]),
            Arc::new(MemoryDownloads::default()),
        );
        assert_eq!(widget.source_column(), "review");
        assert_eq!(widget.dest_column(), "sentiment");
    }

    #[tokio::test]
    async fn test_blank_columns_block_network_call() {
        for (source, dest) in [("", "x"), ("x", "  "), ("\t", "\n")] {
            let client = ScriptedClient::with(vec![csv_reply(b"x\n")]);
            let mut widget = ready_widget(client.clone(), Arc::new(MemoryDownloads::default()));
            widget.on_source_column_changed(source);
            widget.on_dest_column_changed(dest);
            let frames_before = widget.view().frames.len();

            widget.on_submit_clicked().await;

            assert_eq!(client.calls(), 0);
            assert_eq!(
                widget.state().message(),
                Some(&StatusMessage::error("Please enter both column names."))
            );
            // never entered the loading state
            assert!(widget.view().frames[frames_before..]
                .iter()
                .all(|frame| !frame.is_loading()));
            assert!(widget.state().is_submit_enabled());
        }
    }

    #[tokio::test]
    async fn test_submit_without_file_does_nothing() {
        let client = ScriptedClient::with(vec![csv_reply(b"x\n")]);
        let mut widget = widget_with(client.clone(), Arc::new(MemoryDownloads::default()));
        widget.on_source_column_changed("a");
        widget.on_dest_column_changed("b");

        widget.on_submit_clicked().await;
        assert_eq!(client.calls(), 0);
        assert!(widget.state().message().is_none());
    }

    #[tokio::test]
    async fn test_service_error_message_shown_without_download() {
        let client = ScriptedClient::with(vec![json_reply(
            400,
            r#"{"message":"bad column","status":"error"}"#,
        )]);
        let downloads = Arc::new(MemoryDownloads::default());
        let mut widget = ready_widget(client.clone(), downloads.clone());

        widget.on_submit_clicked().await;

        assert_eq!(client.calls(), 1);
        assert_eq!(
            widget.state().message(),
            Some(&StatusMessage::error("bad column"))
        );
        assert!(downloads.saved.lock().unwrap().is_empty());
        assert!(!widget.state().is_loading());
        assert!(widget.state().is_submit_enabled());
    }

    #[tokio::test]
    async fn test_csv_reply_downloads_updated_csv() {
        let body = b"review,sentiment\nGreat,Positive\n";
        let client = ScriptedClient::with(vec![csv_reply(body)]);
        let downloads = Arc::new(MemoryDownloads::default());
        let mut widget = ready_widget(client.clone(), downloads.clone());

        widget.on_submit_clicked().await;

        assert_eq!(
            widget.state().message(),
            Some(&StatusMessage::success("CSV processed successfully!"))
        );
        let saved = downloads.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, "updated.csv");
        assert_eq!(saved[0].1, body.to_vec());

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests[0].source_column, "review");
        assert_eq!(requests[0].dest_column, "sentiment");
        assert_eq!(requests[0].file_name, "reviews.csv");
    }

    #[tokio::test]
    async fn test_transport_failure_shows_generic_message_and_restores_controls() {
        let client = ScriptedClient::with(vec![Err(AppError::TransportError(
            "connection refused".to_string(),
        ))]);
        let mut widget = ready_widget(client, Arc::new(MemoryDownloads::default()));

        widget.on_submit_clicked().await;

        assert_eq!(
            widget.state().message(),
            Some(&StatusMessage::error("Something went wrong. Please try again."))
        );
        assert!(!widget.state().is_loading());
        assert!(widget.state().is_submit_enabled());
    }

    #[tokio::test]
    async fn test_http_failure_without_json_is_generic_error() {
        let client = ScriptedClient::with(vec![Ok(ServiceReply {
            status: 500,
            content_type: Some("text/plain".to_string()),
            body: b"Internal Server Error".to_vec(),
        })]);
        let downloads = Arc::new(MemoryDownloads::default());
        let mut widget = ready_widget(client, downloads.clone());

        widget.on_submit_clicked().await;

        assert_eq!(
            widget.state().message(),
            Some(&StatusMessage::error(GENERIC_FAILURE_MESSAGE))
        );
        assert!(downloads.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_loading_frame_precedes_result_frame() {
        let client = ScriptedClient::with(vec![json_reply(
            200,
            r#"{"message":"done","status":"no_change"}"#,
        )]);
        let mut widget = ready_widget(client, Arc::new(MemoryDownloads::default()));
        let start = widget.view().frames.len();

        widget.on_submit_clicked().await;

        let frames = &widget.view().frames[start..];
        assert_eq!(frames.len(), 2);
        assert!(frames[0].is_loading());
        assert!(!frames[0].is_submit_enabled());
        assert!(frames[0].message().is_none());
        assert!(!frames[1].is_loading());
        assert_eq!(frames[1].message(), Some(&StatusMessage::info("done")));
    }

    #[tokio::test]
    async fn test_sequential_submissions_start_clean() {
        let client = ScriptedClient::with(vec![
            json_reply(400, r#"{"message":"bad column","status":"error"}"#),
            csv_reply(b"x\n"),
        ]);
        let downloads = Arc::new(MemoryDownloads::default());
        let mut widget = ready_widget(client.clone(), downloads.clone());

        widget.on_submit_clicked().await;
        assert_eq!(widget.state().message(), Some(&StatusMessage::error("bad column")));
        let second_start = widget.view().frames.len();

        widget.on_submit_clicked().await;

        assert_eq!(client.calls(), 2);
        let second = &widget.view().frames[second_start..];
        assert!(second[0].is_loading());
        assert!(second[0].message().is_none());
        assert_eq!(
            widget.state().message(),
            Some(&StatusMessage::success(SUCCESS_MESSAGE))
        );
        assert_eq!(downloads.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_download_replaces_success_message() {
        let client = ScriptedClient::with(vec![csv_reply(b"x\n")]);
        let mut widget = ready_widget(client, Arc::new(BrokenDownloads));

        widget.on_submit_clicked().await;

        assert_eq!(
            widget.state().message(),
            Some(&StatusMessage::error(GENERIC_FAILURE_MESSAGE))
        );
        assert!(widget.state().is_submit_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_download_waits_for_delay() {
        let client = ScriptedClient::with(vec![csv_reply(b"x\n")]);
        let downloads = Arc::new(MemoryDownloads::default());
        let mut widget = UploadWidget::new(
            TransferUseCase::new(client),
            downloads.clone(),
            RecordingView::default(),
            Duration::from_millis(600),
        );
        widget.on_file_chosen(Some(FileCandidate::new("a.csv", Vec::new())));
        widget.on_source_column_changed("a");
        widget.on_dest_column_changed("b");

        let started = tokio::time::Instant::now();
        widget.on_submit_clicked().await;

        assert!(started.elapsed() >= Duration::from_millis(600));
        assert_eq!(downloads.saved.lock().unwrap().len(), 1);
    }
}
