use card_corrector::{
    CorrectionOutcome, CompletionClient, Corrector, CorrectorConfig, EditorAction, EditorHost,
    Note, SNAPSHOT_FIELD,
};
use dotenv::dotenv;

/// Prints what a real editor would display.
struct ConsoleEditor;

impl EditorHost for ConsoleEditor {
    fn reload_note(&mut self) {
        println!("🔄 Note reloaded");
    }

    fn show_info(&mut self, message: &str) {
        eprintln!("❌ {}", message);
    }

    fn tooltip(&mut self, message: &str) {
        println!("💬 {}", message);
    }

    fn set_action_enabled(&mut self, action: EditorAction, enabled: bool) {
        let state = if enabled { "enabled" } else { "disabled" };
        println!("🔘 {} {}", action.tip(), state);
    }
}

fn print_note(label: &str, note: &Note) {
    println!("{}", label);
    for (name, value) in note.iter() {
        println!("  {}: {}", name, value);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Reads CORRECTOR_API_KEY / CORRECTOR_MODEL / CORRECTOR_BASE_URL.
    let config = match std::env::args().nth(1) {
        Some(path) => CorrectorConfig::from_file(path)?,
        None => CorrectorConfig::default(),
    }
    .with_env_overrides();

    println!("🚀 Using model {} at {}", config.model, config.base_url());
    let corrector = Corrector::new(CompletionClient::new(config)?);
    let mut editor = ConsoleEditor;

    let mut note = Note::from_pairs([
        ("Front", "this is a sentance"),
        ("Back", "<b>ansewr</b> !improve"),
        (SNAPSHOT_FIELD, ""),
    ]);
    print_note("📝 Before:", &note);

    if let CorrectionOutcome::Applied { changed, .. } =
        corrector.check_grammar(&mut note, &mut editor).await
    {
        println!("✅ {} field(s) changed", changed);
        print_note("📝 After:", &note);

        corrector.undo(&mut note, &mut editor);
        print_note("↩️  After undo:", &note);
    }

    Ok(())
}
