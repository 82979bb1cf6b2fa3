//! Fee structure display formatting

use crate::models::{BillingFrequency, Currency, FeeItem, Money};

/// Format the fee structure with prices in both currencies
pub fn format_fee_list(fees: &[FeeItem]) -> String {
    if fees.is_empty() {
        return "No fee items found.".to_string();
    }

    let name_width = fees.iter().map(|f| f.name.len()).max().unwrap_or(0).max(15);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>12}  {:>18}  {:<9}  {}\n",
        "Fee",
        "USD",
        "ZIG",
        "Frequency",
        "Required",
        name_width = name_width
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->12}  {:->18}  {:-<9}  {:-<8}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width
    ));

    for fee in fees {
        output.push_str(&format!(
            "{:<name_width$}  {:>12}  {:>18}  {:<9}  {}\n",
            fee.name,
            Currency::Usd.format(fee.amount_usd),
            Currency::Zig.format(fee.amount_zig),
            fee.frequency,
            if fee.required { "Yes" } else { "Optional" },
            name_width = name_width
        ));
    }

    let per_term = |currency: Currency| -> Money {
        fees.iter()
            .filter(|f| f.required && f.frequency == BillingFrequency::PerTerm)
            .map(|f| f.amount(currency))
            .sum()
    };

    output.push_str(&format!(
        "{:-<name_width$}  {:->12}  {:->18}\n",
        "",
        "",
        "",
        name_width = name_width
    ));
    output.push_str(&format!(
        "{:<name_width$}  {:>12}  {:>18}\n",
        "Required / term",
        Currency::Usd.format(per_term(Currency::Usd)),
        Currency::Zig.format(per_term(Currency::Zig)),
        name_width = name_width
    ));

    output
}
