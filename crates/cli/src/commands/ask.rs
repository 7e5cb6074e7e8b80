//! `quickmd ask`: Run one task (or all) on a case.

use quickmd_config::TemplateStore;
use quickmd_core::task::TaskId;
use quickmd_pipeline::Selection;

pub async fn run(
    task: Option<String>,
    all: bool,
    case: Option<String>,
    template: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;

    let case_text = match (case, template) {
        (Some(text), _) => text,
        (None, Some(label)) => {
            let templates = TemplateStore::load(&config.templates_path);
            templates
                .get(&label)
                .map(|t| t.text.clone())
                .ok_or_else(|| format!("Unknown template '{label}'. Run `quickmd templates` to list them."))?
        }
        (None, None) => return Err("Provide a case with --case or --template".into()),
    };

    let selection = if all {
        Selection::All
    } else {
        let task: TaskId = match task {
            Some(t) => t.parse()?,
            None => TaskId::Treatment,
        };
        Selection::Single(task)
    };

    let pipeline = super::build_pipeline(&config)?;

    eprint!("  Thinking...");
    let entry = pipeline.execute(selection, &case_text).await;
    eprint!("\r              \r");

    super::print_entry(&entry?);
    Ok(())
}
