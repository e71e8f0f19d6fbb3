use invoicedesk_invoicing::{FormData, Invoice};

// -------------------------
// Request DTOs
// -------------------------

/// Urlencoded form body as posted by the invoice forms.
pub type InvoiceForm = FormData;

// -------------------------
// Response mapping
// -------------------------

pub fn invoice_to_json(invoice: &Invoice) -> serde_json::Value {
    serde_json::json!({
        "id": invoice.id.to_string(),
        "customer_id": invoice.customer_id.as_str(),
        "amount": invoice.amount.value(),
        "amount_display": invoice.amount.to_string(),
        "status": invoice.status.as_str(),
        "date": invoice.date.format("%Y-%m-%d").to_string(),
    })
}

pub fn listing_to_json(invoices: &[Invoice]) -> serde_json::Value {
    serde_json::json!({
        "invoices": invoices.iter().map(invoice_to_json).collect::<Vec<_>>(),
    })
}
