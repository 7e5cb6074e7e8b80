//! `quickmd tasks`: List the clinical tasks.

use quickmd_core::task::Task;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Available tasks:\n");
    for task in Task::all() {
        println!("  {:<18} {}", task.id.as_str(), task.label);
        println!("  {:<18} {}\n", "", task.instruction);
    }
    Ok(())
}
