use super::domain::SUPPORTED_RECEIPT_EXTENSIONS;
use super::listing::{BillRow, BillsPage};

pub fn render_bills_page(page: &BillsPage) -> String {
    match page {
        BillsPage::Loading => render_loading(),
        BillsPage::Error(message) => render_error(message),
        BillsPage::Ready(rows) => render_bills_table(rows),
    }
}

fn render_loading() -> String {
    "<div class=\"layout\"><div class=\"content\" id=\"loading\">Loading...</div></div>\n"
        .to_string()
}

fn render_error(message: &str) -> String {
    format!(
        "<div class=\"layout\"><div class=\"content\" id=\"error-page\">\n\
         <h1>Erreur</h1>\n\
         <div data-testid=\"error-message\">{}</div>\n\
         </div></div>\n",
        escape_html(message)
    )
}

fn render_bills_table(rows: &[BillRow]) -> String {
    let mut html = String::from(
        "<div class=\"layout\"><div class=\"content\">\n\
         <div class=\"content-header\">\n\
         <div class=\"content-title\">Mes notes de frais</div>\n\
         <button type=\"button\" data-testid=\"btn-new-bill\" class=\"btn btn-primary\">Nouvelle note de frais</button>\n\
         </div>\n\
         <div id=\"data-table\"><table id=\"example\" class=\"table table-striped\">\n\
         <thead><tr><th>Type</th><th>Nom</th><th>Date</th><th>Montant</th><th>Statut</th><th>Actions</th></tr></thead>\n\
         <tbody data-testid=\"tbody\">\n",
    );

    for row in rows {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{} €</td><td>{}</td><td>\
             <div class=\"icon-actions\"><div id=\"eye\" data-testid=\"icon-eye\" data-bill-url=\"{}\"></div></div>\
             </td></tr>\n",
            escape_html(&row.expense_type),
            escape_html(&row.name),
            escape_html(&row.date),
            row.amount,
            row.status,
            escape_html(row.file_url.as_deref().unwrap_or_default()),
        ));
    }

    html.push_str(
        "</tbody></table></div>\n\
         </div></div>\n\
         <div class=\"modal fade\" id=\"modaleFile\" tabindex=\"-1\" role=\"dialog\">\n\
         <div class=\"modal-dialog modal-dialog-centered modal-lg\" role=\"document\"><div class=\"modal-content\">\n\
         <div class=\"modal-header\"><h5 class=\"modal-title\">Justificatif</h5></div>\n\
         <div class=\"modal-body\"></div>\n\
         </div></div></div>\n",
    );
    html
}

pub fn render_new_bill_page() -> String {
    let accept = SUPPORTED_RECEIPT_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "<div class=\"layout\"><div class=\"content\">\n\
         <div class=\"content-header\"><div class=\"content-title\">Envoyer une note de frais</div></div>\n\
         <form data-testid=\"form-new-bill\">\n\
         <select required data-testid=\"expense-type\">\
         <option>Transports</option><option>Restaurants et bars</option><option>Hôtel et logement</option>\
         <option>Services en ligne</option><option>IT et électronique</option><option>Equipement et matériel</option>\
         <option>Fournitures de bureau</option></select>\n\
         <input type=\"text\" data-testid=\"expense-name\" placeholder=\"Vol Paris Londres\" />\n\
         <input required type=\"date\" data-testid=\"datepicker\" />\n\
         <input required type=\"number\" data-testid=\"amount\" placeholder=\"348\" />\n\
         <input type=\"number\" data-testid=\"vat\" placeholder=\"70\" />\n\
         <input type=\"number\" data-testid=\"pct\" placeholder=\"20\" />\n\
         <textarea data-testid=\"commentary\"></textarea>\n\
         <input required type=\"file\" accept=\"{accept}\" data-testid=\"file\" />\n\
         <button type=\"submit\" id=\"btn-send-bill\" class=\"btn btn-primary\">Envoyer</button>\n\
         </form>\n\
         </div></div>\n"
    )
}

/// Body of the receipt dialog.
pub fn receipt_preview_html(url: &str, width: u32) -> String {
    format!(
        "<div style=\"text-align: center;\" class=\"bill-proof-container\"><img width=\"{width}\" src=\"{}\" alt=\"Bill\" /></div>",
        escape_html(url)
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
