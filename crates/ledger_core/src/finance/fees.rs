//! Fee totals and invoice sequencing.

use crate::model::{Item, Project};

/// Sum of item fees, `0.0` for no items.
pub fn calculate_fee_total(items: &[Item]) -> f64 {
    items.iter().map(|item| item.fee).sum()
}

/// Sum of every project's fee total.
pub fn projects_fee_total(projects: &[Project]) -> f64 {
    projects
        .iter()
        .map(|project| calculate_fee_total(&project.items))
        .sum()
}

/// Highest invoice number in use.
///
/// Each project contributes its invoice number, or `default_invoice_number`
/// when it has none; an empty list yields `default_invoice_number`. The caller
/// adds one when issuing the next invoice.
pub fn next_invoice_number(projects: &[Project], default_invoice_number: i64) -> i64 {
    projects
        .iter()
        .map(|project| {
            project
                .invoice
                .as_ref()
                .map_or(default_invoice_number, |invoice| invoice.number)
        })
        .max()
        .unwrap_or(default_invoice_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Invoice, ItemType};

    fn project_with_fees(fees: &[f64]) -> Project {
        let mut project = Project::new("Gig");
        for fee in fees {
            project.add_item(Item::new("line", *fee, ItemType::Session));
        }
        project
    }

    fn project_with_invoice(number: i64) -> Project {
        let mut project = Project::new("Invoiced");
        project.invoice = Some(Invoice::new(number, format!("Invoice_{number}")));
        project
    }

    #[test]
    fn fee_total_of_nothing_is_zero() {
        assert_eq!(calculate_fee_total(&[]), 0.0);
        assert_eq!(projects_fee_total(&[]), 0.0);
    }

    #[test]
    fn fee_totals_sum_items() {
        let project = project_with_fees(&[150.0, 75.0]);
        assert_eq!(calculate_fee_total(&project.items), 225.0);

        let projects = vec![project, project_with_fees(&[]), project_with_fees(&[100.5])];
        assert_eq!(projects_fee_total(&projects), 325.5);
    }

    #[test]
    fn next_invoice_number_defaults() {
        assert_eq!(next_invoice_number(&[], 1000), 1000);
        assert_eq!(next_invoice_number(&[project_with_fees(&[])], 1000), 1000);
    }

    #[test]
    fn next_invoice_number_takes_max() {
        let projects = vec![
            project_with_invoice(1001),
            project_with_fees(&[]),
            project_with_invoice(1005),
        ];
        assert_eq!(next_invoice_number(&projects, 1000), 1005);
    }
}
