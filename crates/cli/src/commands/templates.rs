//! `quickmd templates`: List the case templates.

use quickmd_config::TemplateStore;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let templates = TemplateStore::load(&config.templates_path);

    println!("Case templates ({}):\n", templates.len());
    for template in templates.iter() {
        println!("  {}", template.label);
        println!("    {}\n", template.text);
    }
    Ok(())
}
