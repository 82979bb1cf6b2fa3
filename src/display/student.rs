//! Student display formatting
//!
//! Roster tables, student detail views and fee statements.

use crate::models::Student;
use crate::services::StudentStatement;

/// Format the roster as a table
pub fn format_student_list(students: &[Student]) -> String {
    if students.is_empty() {
        return "No students found matching the selected filters.".to_string();
    }

    let name_width = students
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8}  {:<name_width$}  {:<6}  {:<5}  {:<7}  {:<16}  {:>10}  {}\n",
        "ID",
        "Name",
        "Gender",
        "Class",
        "Section",
        "Guardian",
        "Arrears",
        "Status",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<8}  {:-<name_width$}  {:-<6}  {:-<5}  {:-<7}  {:-<16}  {:->10}  {:-<7}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for student in students {
        output.push_str(&format!(
            "{:<8}  {:<name_width$}  {:<6}  {:<5}  {:<7}  {:<16}  {:>10}  {}\n",
            student.id,
            student.name,
            student.gender,
            student.class,
            student.section,
            student.guardian.name,
            student.arrears,
            student.fees_status,
            name_width = name_width,
        ));
    }

    output.push_str(&format!("\n{} student(s)\n", students.len()));
    output
}

/// Format a single student's record
pub fn format_student_details(student: &Student) -> String {
    let mut output = String::new();

    output.push_str(&format!("Student: {}\n", student.name));
    output.push_str(&format!("  ID:             {}\n", student.id));
    output.push_str(&format!("  Gender:         {}\n", student.gender));
    output.push_str(&format!(
        "  Class:          {} (section {})\n",
        student.class, student.section
    ));
    output.push_str(&format!("  Date of Birth:  {}\n", student.date_of_birth));
    if !student.address.is_empty() {
        output.push_str(&format!("  Address:        {}\n", student.address));
    }
    if !student.mobile.is_empty() {
        output.push_str(&format!("  Mobile:         {}\n", student.mobile));
    }
    if !student.email.is_empty() {
        output.push_str(&format!("  Email:          {}\n", student.email));
    }

    output.push('\n');
    output.push_str(&format!(
        "  Guardian:       {} ({})\n",
        student.guardian.name, student.guardian.relationship
    ));
    if !student.guardian.mobile.is_empty() {
        output.push_str(&format!("  Guardian Phone: {}\n", student.guardian.mobile));
    }

    output.push('\n');
    output.push_str(&format!("  Fees Status:    {}\n", student.fees_status));
    output.push_str(&format!("  Arrears:        {}\n", student.arrears));
    if !student.optional_fees.is_empty() {
        output.push_str(&format!(
            "  Optional Fees:  {}\n",
            student.optional_fees.join(", ")
        ));
    }
    if let Some(term) = &student.enrolled_term {
        output.push_str(&format!("  Enrolled:       {}\n", term));
    }

    output
}

/// Format a fee statement with its per-item lines and totals
pub fn format_statement(statement: &StudentStatement) -> String {
    let fmt = |m| statement.currency.format(m);
    let mut output = String::new();

    output.push_str(&format!(
        "Fee Statement: {} #{} ({})\n",
        statement.student_name, statement.student_id, statement.class_label
    ));
    output.push_str(&format!(
        "{} - amounts in {}\n\n",
        statement.term_name, statement.currency
    ));

    if statement.lines.is_empty() {
        output.push_str("No fees billed for this term.\n");
    } else {
        output.push_str(&format!(
            "{:<20}  {:>17}  {:>17}  {:>17}  {}\n",
            "Fee", "Billed", "Paid", "Balance", "Status"
        ));
        output.push_str(&format!(
            "{:-<20}  {:->17}  {:->17}  {:->17}  {:-<7}\n",
            "", "", "", "", ""
        ));
        for line in &statement.lines {
            output.push_str(&format!(
                "{:<20}  {:>17}  {:>17}  {:>17}  {}\n",
                line.fee_name,
                fmt(line.billed),
                fmt(line.paid),
                fmt(line.balance()),
                line.status()
            ));
        }
        output.push_str(&format!(
            "{:-<20}  {:->17}  {:->17}  {:->17}  {:-<7}\n",
            "", "", "", "", ""
        ));
        output.push_str(&format!(
            "{:<20}  {:>17}  {:>17}  {:>17}  {}\n",
            "TOTAL",
            fmt(statement.total_due()),
            fmt(statement.total_paid()),
            fmt(statement.outstanding()),
            statement.status()
        ));
    }

    output.push_str(&format!("\nPaid: {}%\n", statement.percent_paid()));
    if statement.unallocated.is_positive() {
        output.push_str(&format!("Credit: {}\n", fmt(statement.unallocated)));
    }

    output
}
