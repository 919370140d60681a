//! Transaction grid page - HTML rendering

use crate::{ApiError, AppState};
use axum::extract::{Query, State};
use axum::response::Html;
use gridbook_core::TransactionFilter;
use gridbook_utils::format_amount;
use std::collections::HashMap;

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Gridbook</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        title, content
    )
}

/// Transaction grid page: the current page of records as a read-only table
pub async fn page_transactions(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    let page = params.get("page").and_then(|s| s.parse().ok()).unwrap_or(1);
    let page_size = state.config.pagination.records_per_page;
    let listing = state
        .repo
        .list(page, page_size, &TransactionFilter::default())
        .await?;

    let mut rows = String::new();
    for tx in &listing.items {
        rows.push_str(&format!(
            r#"<tr class='border-b hover:bg-gray-50'>
                <td class='px-4 py-2 text-sm'>{}</td>
                <td class='px-4 py-2 text-sm'>{}</td>
                <td class='px-4 py-2 text-sm'>{}</td>
                <td class='px-4 py-2 text-sm text-right'>Rp {}</td>
                <td class='px-4 py-2 text-sm text-gray-500'>{}</td>
            </tr>"#,
            tx.date.format("%Y-%m-%d"),
            tx.from,
            tx.to,
            format_amount(tx.amount),
            tx.note
        ));
    }

    if listing.items.is_empty() {
        rows.push_str(
            r#"<tr><td colspan='5' class='px-4 py-8 text-center text-gray-500'>No transactions</td></tr>"#,
        );
    }

    let content = format!(
        r#"<div class='max-w-5xl mx-auto p-6'>
        <div class='mb-4 flex items-center justify-between'>
            <h2 class='text-2xl font-bold'>Transactions</h2>
            <span class='text-sm text-gray-500'>{} record(s), page {} / {}</span>
        </div>
        <div class='bg-white rounded-xl shadow-sm overflow-hidden'>
            <table class='w-full'>
                <thead class='bg-gray-100 text-left text-sm'>
                    <tr>
                        <th class='px-4 py-2'>Date</th>
                        <th class='px-4 py-2'>From</th>
                        <th class='px-4 py-2'>To</th>
                        <th class='px-4 py-2 text-right'>Amount</th>
                        <th class='px-4 py-2'>Note</th>
                    </tr>
                </thead>
                <tbody>{}</tbody>
            </table>
        </div>
    </div>"#,
        listing.total_count,
        listing.page,
        listing.total_pages().max(1),
        rows
    );

    Ok(Html(base_html("Transactions", &content)))
}
