//! `tutor students` -- inspect and seed the student table.

use comfy_table::{Table, presets::UTF8_FULL};
use tutor_core::StudentStore;
use tutor_types::{StudentRecord, TutorConfig};

/// Print every registered student.
pub async fn students_list(config: &TutorConfig) -> anyhow::Result<()> {
    let store = super::open_store(config).await?;
    let students = store.list().await?;

    if students.is_empty() {
        println!(
            "No students in {}. Run `tutor students init` to add the demo students.",
            store.path().display()
        );
        return Ok(());
    }

    println!("{}", students_table(&students));
    Ok(())
}

/// Create the table and insert (or refresh) the demo students.
pub async fn students_init(config: &TutorConfig) -> anyhow::Result<()> {
    let store = super::open_store(config).await?;
    let written = store.seed_demo().await?;
    println!("Seeded {written} students into {}", store.path().display());
    Ok(())
}

fn students_table(students: &[StudentRecord]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Name", "Subject", "Age"]);
    for s in students {
        table.add_row(vec![s.name.clone(), s.subject.to_string(), s.age.to_string()]);
    }
    table
}
