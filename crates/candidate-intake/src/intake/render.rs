use html_escape::encode_safe;

use super::domain::{FieldErrors, ValidatedPayload};

const STYLESHEET: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";

pub(crate) fn success_page(message: &str, payload: &ValidatedPayload) -> String {
    let summary = serde_json::to_string_pretty(payload).unwrap_or_default();
    let body = format!(
        concat!(
            "<div class=\"card\">",
            "<div class=\"card-header\">Resumo (sanitizado)</div>",
            "<div class=\"card-body\"><pre class=\"mb-0\"><code>{}</code></pre></div>",
            "</div>"
        ),
        encode_safe(&summary)
    );
    page(true, message, &body)
}

pub(crate) fn failure_page(message: &str, errors: Option<&FieldErrors>) -> String {
    let body = match errors {
        Some(errors) if !errors.is_empty() => {
            let items: String = errors
                .iter()
                .map(|(field, error)| {
                    format!(
                        "<li class=\"list-group-item\"><strong>{}:</strong> {}</li>",
                        encode_safe(field.wire_name()),
                        encode_safe(error)
                    )
                })
                .collect();
            format!("<ul class=\"mt-3 list-group\">{items}</ul>")
        }
        _ => String::new(),
    };
    page(false, message, &body)
}

fn page(ok: bool, message: &str, body: &str) -> String {
    let (title, alert, headline) = if ok {
        ("Sucesso", "alert-success", "Dados recebidos com sucesso.")
    } else {
        ("Erro", "alert-danger", "Falha na validação.")
    };

    format!(
        concat!(
            "<!doctype html><html lang=\"pt-br\"><head>",
            "<meta charset=\"utf-8\">",
            "<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">",
            "<title>{title}</title>",
            "<link href=\"{stylesheet}\" rel=\"stylesheet\">",
            "</head><body class=\"bg-light\"><div class=\"container py-5\">",
            "<div class=\"alert {alert}\"><strong>{headline}</strong> {message}</div>",
            "{body}",
            "<a class=\"btn btn-secondary mt-4\" href=\"formulario.html\">Voltar</a>",
            "</div></body></html>"
        ),
        title = title,
        stylesheet = STYLESHEET,
        alert = alert,
        headline = headline,
        message = encode_safe(message),
        body = body,
    )
}
