use crate::db::AppendOutcome;
use crate::models::{History, RecommendationRow, UserSelection, FAVORITE_COUNT, GENRES, LANGUAGES};

const STYLE: &str = r#"
    body { background-color: #f0f0f0; font-family: sans-serif; }
    main { max-width: 800px; margin: 0 auto; padding: 20px; }
    .header, .content, .results { padding: 20px; border-radius: 10px; margin-bottom: 20px; }
    .header { background-color: white; }
    .content { background-color: #ffffe0; }
    .results { background-color: #e6f3ff; }
    .columns { display: grid; grid-template-columns: repeat(3, 1fr); gap: 4px 12px; }
    .instructions { list-style: none; padding-left: 0; }
    .instructions li { margin-bottom: 10px; }
    .warning { background-color: #fff3cd; padding: 10px; border-radius: 5px; }
    .info { background-color: #d1ecf1; padding: 10px; border-radius: 5px; }
    table { width: 100%; border-collapse: collapse; background-color: #e6f3ff; }
    th { background-color: #4a86e8; color: white; }
    td, th { padding: 6px; white-space: normal; word-wrap: break-word; text-align: left; }
    button, .button { background-color: #4CAF50; color: white; padding: 10px 20px; border: none;
        border-radius: 5px; cursor: pointer; text-decoration: none; display: inline-block; }
"#;

const ROW_HEADERS: [&str; 3] = ["Film Adı", "Tür", "Kısa Özet"];

/// Everything the single page can show for one request
#[derive(Debug, Default)]
pub struct PageView {
    /// Values to pre-fill the form with
    pub selection: Option<UserSelection>,
    pub warning: Option<String>,
    pub recommendations: Option<Vec<RecommendationRow>>,
    pub log: Option<AppendOutcome>,
    /// Present only while the history section is toggled on
    pub history: Option<History>,
}

impl PageView {
    fn history_shown(&self) -> bool {
        self.history.is_some()
    }
}

/// Escapes text for use in HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_page(view: &PageView) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"tr\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Film Öneri Sistemi</title>\n<style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<main>\n");

    html.push_str(
        r#"<section class="header">
<h1>Film Öneri Sistemi</h1>
<hr>
<h3>Nasıl Çalışır?</h3>
<ul class="instructions">
<li>✏️ Sevdiğiniz film türlerini seçin</li>
<li>✏️ En sevdiğiniz 3 filmi belirtin</li>
<li>✏️ Bilgileri gönderin</li>
<li>✏️ Size özel film önerileri alın!</li>
</ul>
</section>
"#,
    );

    render_form(&mut html, view);

    if let Some(warning) = &view.warning {
        html.push_str(&format!("<p class=\"warning\">{}</p>\n", escape_html(warning)));
    }

    if let Some(rows) = &view.recommendations {
        html.push_str("<section class=\"results\">\n<h3>Önerilen Filmler</h3>\n");
        if let Some(AppendOutcome::RecoveredFromCorrupt { quarantined_to }) = &view.log {
            html.push_str(&format!(
                "<p class=\"warning\">Önceki öneri kaydı okunamadı ve {} olarak saklandı.</p>\n",
                escape_html(&quarantined_to.display().to_string()),
            ));
        }
        render_rows(&mut html, rows);
        html.push_str("</section>\n");
    }

    render_history_toggles(&mut html);

    if let Some(history) = &view.history {
        render_history(&mut html, history);
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_form(html: &mut String, view: &PageView) {
    let action = if view.history_shown() {
        "/?history=show"
    } else {
        "/"
    };
    let selection = view.selection.as_ref();

    html.push_str(&format!(
        "<form class=\"content\" method=\"post\" action=\"{}\">\n",
        action,
    ));

    html.push_str("<h3>Film Türleri</h3>\n");
    let chosen_genres = selection.map(|s| s.genres.as_slice()).unwrap_or_default();
    render_checkboxes(html, "genres", &GENRES, chosen_genres);

    html.push_str("<h3>Tercih Edilen Diller</h3>\n");
    let chosen_languages = selection.map(|s| s.languages.as_slice()).unwrap_or_default();
    render_checkboxes(html, "languages", &LANGUAGES, chosen_languages);

    html.push_str("<h3>En Sevdiğiniz 3 Film</h3>\n");
    for i in 0..FAVORITE_COUNT {
        let value = selection
            .map(|s| s.favorite_movies[i].as_str())
            .unwrap_or_default();
        html.push_str(&format!(
            "<p><label>{n}. Film <input type=\"text\" name=\"favorite_movies\" placeholder=\"{n}. Film\" value=\"{v}\"></label></p>\n",
            n = i + 1,
            v = escape_html(value),
        ));
    }

    html.push_str(
        "<button type=\"submit\" title=\"Click to get recommendations\">Öneriler Al</button>\n</form>\n",
    );
}

fn render_checkboxes(html: &mut String, name: &str, options: &[&str], chosen: &[String]) {
    html.push_str("<div class=\"columns\">\n");
    for option in options {
        let checked = if chosen.iter().any(|c| c == option) {
            " checked"
        } else {
            ""
        };
        html.push_str(&format!(
            "<label><input type=\"checkbox\" name=\"{}\" value=\"{v}\"{}> {v}</label>\n",
            name,
            checked,
            v = escape_html(option),
        ));
    }
    html.push_str("</div>\n");
}

fn render_rows(html: &mut String, rows: &[RecommendationRow]) {
    html.push_str("<table>\n<tr>");
    for header in ROW_HEADERS {
        html.push_str(&format!("<th>{}</th>", header));
    }
    html.push_str("</tr>\n");
    for row in rows {
        html.push_str("<tr>");
        for field in row.fields() {
            html.push_str(&format!("<td>{}</td>", escape_html(field)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");
}

fn render_history_toggles(html: &mut String) {
    html.push_str(
        r#"<p class="columns">
<a class="button" href="/?history=show">Önceki Önerileri Göster</a>
<a class="button" href="/?history=hide">Önceki Önerileri Gizle</a>
</p>
"#,
    );
}

fn render_history(html: &mut String, history: &History) {
    html.push_str("<section class=\"results\">\n<h3>Önceki Öneriler</h3>\n");

    if history.is_corrupt() {
        html.push_str(
            "<p class=\"warning\">Öneri kaydı bozuk; bir sonraki öneride yeni bir kayıt başlatılacak.</p>\n",
        );
    } else if history.entries.is_empty() {
        html.push_str("<p class=\"info\">Henüz geçmiş öneri bulunmamaktadır.</p>\n");
    }

    for (i, entry) in history.most_recent_first().enumerate() {
        let input = &entry.user_input;
        html.push_str(&format!("<h4>Öneri {}</h4>\n", i + 1));
        html.push_str("<p><strong>Kullanıcı Seçimleri:</strong></p>\n");
        html.push_str(&format!(
            "<table>\n<tr><th>Seçilen Türler</th><th>Tercih Edilen Diller</th><th>Favori Filmler</th></tr>\n<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n</table>\n",
            escape_html(&input.genres.join(", ")),
            escape_html(&input.languages.join(", ")),
            escape_html(&input.favorite_movies.join(", ")),
        ));
        html.push_str("<p><strong>Önerilen Filmler:</strong></p>\n");
        render_rows(html, &entry.recommendations);
        html.push_str("<hr>\n");
    }

    html.push_str("</section>\n");
}
