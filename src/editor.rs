use crate::error::{CorrectionError, Result};
use crate::llm::prompts::compose_messages;
use crate::llm::{CompletionBackend, CompletionRequest};
use crate::note::{CorrectionResult, Note};
use crate::response::parse_correction;
use crate::schema::CorrectionSchema;
use crate::snapshot::{restore, snapshot, RestoreOutcome};
use log::{debug, info, warn};
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};

pub const MSG_CHECKED: &str = "Grammar checked.";
pub const MSG_CHECKED_NO_UNDO: &str = "Undo not available. Grammar checked.";
pub const MSG_BUSY: &str = "A grammar check is already running.";
pub const MSG_UNDONE: &str = "Changes undone.";
pub const MSG_NOTHING_TO_UNDO: &str = "No changes to undo.";

/// The editor surface the corrector drives. Implemented by the host
/// application; the note itself is passed separately.
pub trait EditorHost {
    /// Redisplay the note after its fields changed.
    fn reload_note(&mut self);

    /// Blocking notice, used for failures.
    fn show_info(&mut self, message: &str);

    /// Transient, non-blocking notice.
    fn tooltip(&mut self, message: &str);

    fn set_action_enabled(&mut self, _action: EditorAction, _enabled: bool) {}
}

/// Editor buttons contributed by the corrector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorAction {
    CheckGrammar,
    Undo,
}

impl EditorAction {
    pub const ALL: [EditorAction; 2] = [EditorAction::CheckGrammar, EditorAction::Undo];

    pub fn command(&self) -> &'static str {
        match self {
            EditorAction::CheckGrammar => "check_grammar",
            EditorAction::Undo => "undo",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            EditorAction::CheckGrammar => "icon.png",
            EditorAction::Undo => "undo_icon.png",
        }
    }

    pub fn shortcut(&self) -> &'static str {
        match self {
            EditorAction::CheckGrammar => "Ctrl+Shift+G",
            EditorAction::Undo => "Ctrl+Z",
        }
    }

    pub fn tip(&self) -> String {
        let label = match self {
            EditorAction::CheckGrammar => "Check Grammar",
            EditorAction::Undo => "Undo Changes",
        };
        format!("{} ({})", label, self.shortcut())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionOutcome {
    Applied {
        changed: usize,
        undo_available: bool,
    },
    /// Another check is still in flight; nothing was sent.
    Busy,
    /// The error was reported to the user and the note left unchanged.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    Restored { fields: usize },
    NothingToUndo,
    Failed,
}

/// Runs the check and undo actions for one editor.
pub struct Corrector<B> {
    backend: B,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the request ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Keeps an editor action disabled for as long as it lives. The host is
/// reached through the guard, so a check whose future is dropped mid-request
/// still re-enables its button.
struct ActionDisabled<'a, H: EditorHost> {
    host: &'a mut H,
    action: EditorAction,
}

impl<'a, H: EditorHost> ActionDisabled<'a, H> {
    fn new(host: &'a mut H, action: EditorAction) -> Self {
        host.set_action_enabled(action, false);
        Self { host, action }
    }
}

impl<H: EditorHost> Deref for ActionDisabled<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        &*self.host
    }
}

impl<H: EditorHost> DerefMut for ActionDisabled<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        &mut *self.host
    }
}

impl<H: EditorHost> Drop for ActionDisabled<'_, H> {
    fn drop(&mut self) {
        self.host.set_action_enabled(self.action, true);
    }
}

impl<B: CompletionBackend> Corrector<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn begin(&self) -> Option<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(&self.in_flight))
    }

    /// Asks the model for corrections of every editable field of `note`
    /// without modifying it.
    pub async fn request_corrections(&self, note: &Note) -> Result<CorrectionResult> {
        let schema = CorrectionSchema::for_note(note);
        if schema.is_empty() {
            return Err(CorrectionError::NoEditableFields);
        }

        let request = CompletionRequest {
            messages: compose_messages(note.editable_fields()),
            schema: schema.to_json()?,
            schema_name: CorrectionSchema::NAME.to_string(),
        };

        let raw = self.backend.complete(&request).await?;
        let result = parse_correction(&raw, &schema);
        if let Err(e) = &result {
            debug!("Rejected model output: {}", raw);
            debug!("Reason: {}", e);
        }
        result
    }

    /// The "check grammar" button.
    pub async fn check_grammar<H: EditorHost>(
        &self,
        note: &mut Note,
        host: &mut H,
    ) -> CorrectionOutcome {
        let Some(_guard) = self.begin() else {
            host.tooltip(MSG_BUSY);
            return CorrectionOutcome::Busy;
        };

        let mut host = ActionDisabled::new(host, EditorAction::CheckGrammar);
        let corrections = self.request_corrections(note).await;

        match corrections.and_then(|c| apply_with_snapshot(note, &c)) {
            Ok((changed, undo_available)) => {
                host.reload_note();
                host.tooltip(if undo_available {
                    MSG_CHECKED
                } else {
                    MSG_CHECKED_NO_UNDO
                });
                CorrectionOutcome::Applied {
                    changed,
                    undo_available,
                }
            }
            Err(e) => {
                warn!("Grammar check failed ({:?}): {}", e.kind(), e);
                host.show_info(&e.user_message());
                CorrectionOutcome::Failed
            }
        }
    }

    /// The "undo" button.
    pub fn undo<H: EditorHost>(&self, note: &mut Note, host: &mut H) -> UndoOutcome {
        match restore(note) {
            Ok(RestoreOutcome::Restored { fields }) => {
                info!("Restored {} fields from snapshot", fields);
                host.reload_note();
                host.tooltip(MSG_UNDONE);
                UndoOutcome::Restored { fields }
            }
            Ok(RestoreOutcome::NothingToUndo) => {
                host.tooltip(MSG_NOTHING_TO_UNDO);
                UndoOutcome::NothingToUndo
            }
            Err(e) => {
                warn!("Undo failed: {}", e);
                host.show_info(&e.user_message());
                UndoOutcome::Failed
            }
        }
    }
}

/// Snapshots the note (when it supports undo) and applies the corrections.
/// Returns the number of changed fields and whether undo is available.
fn apply_with_snapshot(note: &mut Note, corrections: &CorrectionResult) -> Result<(usize, bool)> {
    let undo_available = snapshot(note)?;
    let changed = note.apply_corrections(corrections);
    info!(
        "Applied corrections: {} of {} fields changed",
        changed,
        corrections.len()
    );
    Ok((changed, undo_available))
}
