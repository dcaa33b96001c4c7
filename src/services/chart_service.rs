//! `$chart` / `$ta` orchestration
//!
//! Builds a render request from a chat command, runs the blocking render
//! pipeline off the async executor, replies with the image and schedules its
//! deletion. Every failure after the input check is logged and the flow keeps
//! going, so a broken render still ends in a (best-effort) photo reply.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::time::Duration;

use crate::chat::ChatChannel;
use crate::models::{ChartCommand, Photo, RenderRequest, RenderedArtifact, IMAGE_FORMAT, INLINE_INPUT};
use crate::services::cleanup_service::{self, ScheduledTask, ARTIFACT_TTL};
use crate::services::renderer_service::ChartRenderer;
use crate::utils::ChartError;

pub const CHART_WIDTH: u32 = 1015;
pub const CHART_HEIGHT: u32 = 400;
/// Seconds capture-website waits for the widget to load
pub const CAPTURE_DELAY: u32 = 4;
/// Lifetime of the usage prompt (and the command that caused it)
pub const PROMPT_TTL: Duration = Duration::from_secs(6);
/// Pause before removing the triggering message
pub const SOURCE_DELETE_PAUSE: Duration = Duration::from_secs(1);

pub const USAGE_PROMPT: &str = "❌ Please provide a ticker symbol, e.g. `$chart AAPL`";

/// What a chart command ended up doing
pub enum ChartOutcome {
    /// No ticker given; the prompt and the command are deleted by `cleanup`
    UsagePrompt { cleanup: ScheduledTask },
    /// The pipeline ran (successfully or not) and a photo reply was attempted
    Rendered {
        artifact: RenderedArtifact,
        error: Option<ChartError>,
        cleanup: ScheduledTask,
    },
}

/// `<unixtime>-<messageID>-<symbol>-<username>`, unique per command.
///
/// Characters that could leave the image directory are replaced with `_`.
pub fn artifact_base_name(command: &ChartCommand, symbol: &str) -> String {
    format!(
        "{}-{}-{}-{}",
        command.unix_time,
        command.message_id,
        file_name_safe(symbol),
        file_name_safe(&command.username)
    )
}

fn file_name_safe(part: &str) -> String {
    part.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '!' | '-') { c } else { '_' })
        .collect()
}

#[derive(Clone)]
pub struct ChartService {
    renderer: Arc<ChartRenderer>,
    image_dir: PathBuf,
}

impl ChartService {
    pub fn new(renderer: Arc<ChartRenderer>, image_dir: PathBuf) -> Self {
        Self { renderer, image_dir }
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// The fixed-size, inline, dark-mode request for `symbol`
    pub fn build_request(&self, command: &ChartCommand, symbol: &str) -> RenderRequest {
        RenderRequest {
            symbol: symbol.to_string(),
            description: symbol.to_string(),
            time_range: command.time_range.clone(),
            technical_analysis: command.technical_analysis,
            input: INLINE_INPUT.to_string(),
            output: artifact_base_name(command, symbol),
            dir: self.image_dir.clone(),
            html: None,
            format: IMAGE_FORMAT.to_string(),
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
            delay: CAPTURE_DELAY,
            overwrite: true,
            dark_mode: true,
        }
    }

    pub async fn handle_command(&self, chat: Arc<dyn ChatChannel>, command: ChartCommand) -> ChartOutcome {
        let symbol = match command.symbol.as_deref().filter(|s| !s.is_empty()) {
            Some(symbol) => symbol.to_string(),
            None => {
                let cleanup = self.prompt_usage(chat, command.message_id).await;
                return ChartOutcome::UsagePrompt { cleanup };
            }
        };

        tracing::info!(
            "🎨 Chart requested by {}: {} {} (technical analysis: {})",
            command.username,
            symbol,
            command.time_range,
            command.technical_analysis
        );

        let mut request = self.build_request(&command, &symbol);
        let created_at = DateTime::<Utc>::from_timestamp(command.unix_time, 0).unwrap_or_else(Utc::now);
        let artifact = RenderedArtifact::from_request(&request, created_at);

        let renderer = self.renderer.clone();
        let error = match tokio::task::spawn_blocking(move || renderer.render(&mut request)).await {
            Ok(Ok(path)) => {
                tracing::info!("✓ Chart rendered: {}", path.display());
                None
            }
            Ok(Err(e)) => {
                tracing::error!("Chart generation error for {}: {}", symbol, e);
                Some(e)
            }
            Err(e) => {
                tracing::error!("Chart render task for {} did not complete: {}", symbol, e);
                Some(ChartError::Aborted(e.to_string()))
            }
        };

        let photo = Photo {
            path: artifact.path.clone(),
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
        };
        match chat.reply_photo(&photo).await {
            Ok(_) => tracing::info!("✓ Chart sent for {} ({})", symbol, artifact.file_name),
            Err(e) => tracing::error!("Failed to send chart {}: {}", artifact.file_name, e),
        }

        let cleanup = cleanup_service::schedule_artifact_deletion(artifact.path.clone(), ARTIFACT_TTL);

        tokio::time::sleep(SOURCE_DELETE_PAUSE).await;

        if command.delete_source {
            if let Err(e) = chat.delete_message(command.message_id).await {
                tracing::warn!("Failed to delete chart command message: {}", e);
            }
        }

        ChartOutcome::Rendered {
            artifact,
            error,
            cleanup,
        }
    }

    async fn prompt_usage(&self, chat: Arc<dyn ChatChannel>, source_id: u64) -> ScheduledTask {
        tracing::warn!("No ticker provided for chart command");

        let prompt_id = match chat.reply_text(USAGE_PROMPT).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("Failed to send usage prompt: {}", e);
                None
            }
        };

        ScheduledTask::spawn_after(PROMPT_TTL, async move {
            if let Some(prompt_id) = prompt_id {
                if let Err(e) = chat.delete_message(prompt_id).await {
                    tracing::warn!("Failed to delete usage prompt: {}", e);
                }
            }
            if let Err(e) = chat.delete_message(source_id).await {
                tracing::warn!("Failed to delete chart command message: {}", e);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageHandle;
    use crate::services::renderer_service::ProcessRunner;
    use crate::utils::{ChatError, RenderError};
    use serenity::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum ChatEvent {
        Text(String),
        Photo(Photo),
        Delete(MessageHandle),
    }

    struct FakeChat {
        events: Mutex<Vec<ChatEvent>>,
        next_id: AtomicU64,
    }

    impl FakeChat {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                events: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1000),
            })
        }

        fn events(&self) -> Vec<ChatEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatChannel for FakeChat {
        async fn reply_text(&self, text: &str) -> Result<MessageHandle, ChatError> {
            self.events.lock().unwrap().push(ChatEvent::Text(text.to_string()));
            Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
        }

        async fn reply_photo(&self, photo: &Photo) -> Result<MessageHandle, ChatError> {
            self.events.lock().unwrap().push(ChatEvent::Photo(photo.clone()));
            Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
        }

        async fn delete_message(&self, id: MessageHandle) -> Result<(), ChatError> {
            self.events.lock().unwrap().push(ChatEvent::Delete(id));
            Ok(())
        }
    }

    /// Writes a fake png to the `--output` path, or fails
    #[derive(Default)]
    struct FakeRenderer {
        calls: Mutex<Vec<(Vec<String>, Option<String>)>>,
        fail: bool,
    }

    impl ProcessRunner for FakeRenderer {
        fn run(&self, _program: &Path, args: &[String], stdin: Option<&[u8]>) -> Result<Vec<u8>, RenderError> {
            self.calls
                .lock()
                .unwrap()
                .push((args.to_vec(), stdin.map(|b| String::from_utf8_lossy(b).into_owned())));
            if self.fail {
                return Err(RenderError::Failed {
                    status: "exit status: 1".to_string(),
                    output: "page crashed".to_string(),
                });
            }
            let output = args.last().expect("output path");
            std::fs::write(output, b"png").map_err(|e| RenderError::Io(e.to_string()))?;
            Ok(Vec::new())
        }
    }

    fn service(runner: Arc<FakeRenderer>, dir: &Path) -> ChartService {
        let renderer = ChartRenderer::new(PathBuf::from("/usr/bin/capture-website"), runner);
        ChartService::new(Arc::new(renderer), dir.to_path_buf())
    }

    fn command(symbol: Option<&str>) -> ChartCommand {
        ChartCommand {
            symbol: symbol.map(str::to_string),
            time_range: "|1M".to_string(),
            technical_analysis: false,
            delete_source: false,
            unix_time: 1_700_000_000,
            message_id: 42,
            username: "alice".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_symbol_prompts_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(FakeRenderer::default());
        let chat = FakeChat::new();

        let outcome = service(runner.clone(), dir.path())
            .handle_command(chat.clone(), command(None))
            .await;

        let cleanup = match outcome {
            ChartOutcome::UsagePrompt { cleanup } => cleanup,
            ChartOutcome::Rendered { .. } => panic!("rendered without a symbol"),
        };
        assert_eq!(chat.events(), vec![ChatEvent::Text(USAGE_PROMPT.to_string())]);

        cleanup.join().await;

        assert_eq!(
            chat.events(),
            vec![
                ChatEvent::Text(USAGE_PROMPT.to_string()),
                ChatEvent::Delete(1000),
                ChatEvent::Delete(42),
            ]
        );
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_symbol_is_treated_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(FakeRenderer::default());

        let outcome = service(runner.clone(), dir.path())
            .handle_command(FakeChat::new(), command(Some("")))
            .await;

        assert!(matches!(outcome, ChartOutcome::UsagePrompt { .. }));
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_chart_is_rendered_delivered_and_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(FakeRenderer::default());
        let chat = FakeChat::new();
        let mut cmd = command(Some("AAPL"));
        cmd.delete_source = true;

        let outcome = service(runner.clone(), dir.path())
            .handle_command(chat.clone(), cmd)
            .await;

        let (artifact, error, cleanup) = match outcome {
            ChartOutcome::Rendered { artifact, error, cleanup } => (artifact, error, cleanup),
            ChartOutcome::UsagePrompt { .. } => panic!("expected a render"),
        };
        let expected = dir.path().join("1700000000-42-AAPL-alice.png");
        assert!(error.is_none());
        assert_eq!(artifact.path, expected);
        assert_eq!(artifact.created_at.timestamp(), 1_700_000_000);
        assert!(expected.exists());

        let calls = runner.calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 1);
        let (args, stdin) = &calls[0];
        assert_eq!(
            args[..9],
            ["--height", "400", "--width", "1015", "--delay", "4", "--overwrite", "--dark-mode", "--output"]
        );
        assert!(stdin.as_deref().unwrap().contains(r#""AAPL|1M""#));

        assert_eq!(
            chat.events(),
            vec![
                ChatEvent::Photo(Photo {
                    path: expected.clone(),
                    width: 1015,
                    height: 400,
                }),
                ChatEvent::Delete(42),
            ]
        );

        cleanup.join().await;
        assert!(!expected.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_failure_still_attempts_delivery() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(FakeRenderer {
            fail: true,
            ..Default::default()
        });
        let chat = FakeChat::new();

        let outcome = service(runner, dir.path())
            .handle_command(chat.clone(), command(Some("MSFT")))
            .await;

        match outcome {
            ChartOutcome::Rendered { error, .. } => {
                assert!(matches!(error, Some(ChartError::Render(RenderError::Failed { .. }))))
            }
            ChartOutcome::UsagePrompt { .. } => panic!("expected a render attempt"),
        }
        let events = chat.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ChatEvent::Photo(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_technical_analysis_uses_detail_widget() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(FakeRenderer::default());
        let mut cmd = command(Some("TSLA"));
        cmd.technical_analysis = true;

        service(runner.clone(), dir.path())
            .handle_command(FakeChat::new(), cmd)
            .await;

        let calls = runner.calls.lock().unwrap();
        let stdin = calls[0].1.as_deref().unwrap();
        assert!(stdin.contains(r#""symbol": "TSLA""#));
        assert!(stdin.contains(r#""range": "1M""#));
    }

    #[test]
    fn test_output_name_stays_inside_image_dir() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(Arc::new(FakeRenderer::default()), dir.path());
        let cmd = ChartCommand {
            username: "../../evil".to_string(),
            ..command(Some("X/../../TMP/PWN"))
        };

        let request = service.build_request(&cmd, "X/../../TMP/PWN");
        let path = request.artifact_path();

        assert_eq!(request.output, "1700000000-42-X_.._.._TMP_PWN-.._.._evil");
        assert_eq!(path.parent(), Some(dir.path()));
        assert!(!path
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir)));
    }

    #[test]
    fn test_output_names_differ_per_requester_and_message() {
        let alice = command(Some("AAPL"));
        let bob = ChartCommand {
            username: "bob".to_string(),
            ..alice.clone()
        };
        let later = ChartCommand {
            unix_time: alice.unix_time + 1,
            ..alice.clone()
        };
        let other_message = ChartCommand {
            message_id: 43,
            ..alice.clone()
        };

        let names = [
            artifact_base_name(&alice, "AAPL"),
            artifact_base_name(&bob, "AAPL"),
            artifact_base_name(&later, "AAPL"),
            artifact_base_name(&other_message, "AAPL"),
        ];

        assert_eq!(names[0], "1700000000-42-AAPL-alice");
        for (i, a) in names.iter().enumerate() {
            for b in names.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
