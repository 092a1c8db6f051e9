use protocol::options::{AI_TECHNIQUES, DATA_TYPES, DEPARTMENTS, FRAMEWORKS, MARKETS, STAGES};
use protocol::{Evaluation, RiskLevel, UseCaseDraft};
use std::fmt::Write;

const STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 0; color: #1E293B; background: #FFFFFF; }
header { padding: 1.5rem 2rem 0.5rem; border-bottom: 1px solid #E2E8F0; }
header h1 { margin: 0; font-size: 2rem; }
header p { margin: 0.25rem 0 0.75rem; color: #64748B; }
nav a { margin-right: 1rem; color: #3B82F6; text-decoration: none; font-weight: 600; }
main { padding: 1.5rem 2rem; max-width: 1100px; }
.grid { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem 2rem; }
label { display: block; font-weight: 600; margin-bottom: 0.35rem; }
input[type=text], input[type=password], select, textarea { width: 100%; padding: 0.5rem; border: 1px solid #CBD5E1; border-radius: 8px; font: inherit; box-sizing: border-box; }
fieldset { border: 1px solid #E2E8F0; border-radius: 8px; }
fieldset label { font-weight: 400; display: inline-block; margin-right: 1rem; }
button { padding: 0.6rem 1.2rem; border-radius: 8px; border: 1px solid #CBD5E1; background: #F8FAFC; font: inherit; cursor: pointer; }
button.primary { background: #3B82F6; border-color: #3B82F6; color: #FFFFFF; }
.actions { display: flex; gap: 0.75rem; margin-top: 1rem; }
.banner { padding: 0.75rem 1rem; border-radius: 8px; margin-bottom: 1rem; }
.banner.error { background: #FEE2E2; color: #991B1B; }
.banner.warn { background: #FEF3C7; color: #92400E; }
.banner.ok { background: #D1FAE5; color: #065F46; }
.banner.info { background: #EFF6FF; color: #1E3A8A; }
.score-card { background: linear-gradient(135deg, #1E293B 0%, #334155 100%); color: #FFFFFF; border-radius: 16px; padding: 1.5rem; display: flex; justify-content: space-around; text-align: center; margin-bottom: 1.5rem; }
.score-value { font-size: 3rem; font-weight: 700; }
.score-label { opacity: 0.8; }
.card { background: #F8FAFC; border: 1px solid #E2E8F0; border-radius: 12px; padding: 1.25rem; }
.card h4 { margin: 0 0 0.5rem; }
.card p, .card li { color: #475569; font-size: 0.95rem; }
.badge { padding: 0.2rem 0.7rem; border-radius: 20px; font-weight: 600; font-size: 0.8rem; margin-left: 0.5rem; }
.badge.high { background: #FEE2E2; }
.badge.medium { background: #FEF3C7; }
.badge.low { background: #D1FAE5; }
.action-item { margin-bottom: 0.75rem; }
.muted { color: #64748B; }
footer { padding: 1rem 2rem; color: #94A3B8; font-size: 0.8rem; border-top: 1px solid #E2E8F0; }
"#;

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    let frameworks = FRAMEWORKS
        .iter()
        .map(|name| escape(name))
        .collect::<Vec<_>>()
        .join(" &middot; ");
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} - GovLens</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <header><h1>GovLens</h1>\
         <p>Evaluate AI use cases against regulatory frameworks</p>\
         <nav><a href=\"/\">Evaluate Use Case</a><a href=\"/results\">Results</a></nav></header>\n\
         <main>\n{body}\n</main>\n\
         <footer>Frameworks: {frameworks}. Reports are informational and do not constitute legal advice.</footer>\n\
         </body>\n</html>\n",
        title = escape(title),
    )
}

fn level_class(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "high",
        RiskLevel::Medium => "medium",
        RiskLevel::Low => "low",
    }
}

fn badge(level: RiskLevel) -> String {
    format!(
        "<span class=\"badge {}\" style=\"color: #{:06X}\">{}</span>",
        level_class(level),
        report::level_color(level),
        level
    )
}

pub(crate) struct FormView<'a> {
    pub(crate) draft: Option<&'a UseCaseDraft>,
    pub(crate) error: Option<&'a str>,
    pub(crate) notice: Option<&'a str>,
    pub(crate) server_key: bool,
    pub(crate) session_key: bool,
    pub(crate) model: &'a str,
}

pub(crate) fn form_page(view: &FormView<'_>) -> String {
    let empty = UseCaseDraft::default();
    let draft = view.draft.unwrap_or(&empty);
    let mut body = String::new();

    if let Some(error) = view.error {
        let _ = write!(body, "<div class=\"banner error\">{}</div>", escape(error));
    }
    if let Some(notice) = view.notice {
        let _ = write!(body, "<div class=\"banner ok\">{}</div>", escape(notice));
    }
    if view.server_key {
        let _ = write!(
            body,
            "<div class=\"banner info\">API key loaded from server configuration. Model: {}</div>",
            escape(view.model)
        );
    } else if view.session_key {
        body.push_str("<div class=\"banner ok\">API key entered for this session.</div>");
    } else {
        body.push_str(
            "<div class=\"banner warn\">Enter an API key to evaluate. \
             Free keys are available at console.groq.com.</div>",
        );
    }

    body.push_str("<h2>Enter Use Case Details</h2>\n<form method=\"post\" action=\"/evaluate\">\n");
    body.push_str("<div class=\"grid\">\n<div>\n");
    let _ = write!(
        body,
        "<label for=\"name\">Use Case Name *</label>\
         <input type=\"text\" id=\"name\" name=\"name\" value=\"{}\" \
         placeholder=\"e.g., Customer Churn Prediction Model\">",
        escape(&draft.name)
    );
    body.push_str(&select("department", "Department / Business Unit *", DEPARTMENTS, &draft.department));
    body.push_str(&select("ai_techniques", "AI/ML Techniques", AI_TECHNIQUES, &draft.ai_techniques));
    body.push_str("</div>\n<div>\n");
    body.push_str(&select("stage", "Deployment Stage", STAGES, &draft.stage));
    body.push_str(&checkboxes("markets", "Target Markets / Jurisdictions *", MARKETS, &draft.markets));
    body.push_str(&checkboxes("data_types", "Data Types Involved *", DATA_TYPES, &draft.data_types));
    body.push_str("</div>\n</div>\n");

    let _ = write!(
        body,
        "<label for=\"description\">Use Case Description *</label>\
         <textarea id=\"description\" name=\"description\" rows=\"8\" placeholder=\"Describe what this AI system will do:\n\
         - What problem does it solve?\n- What decisions will it make or support?\n\
         - Who will be affected by these decisions?\n- What data does it use?\n\
         - How will outputs be used?\">{}</textarea>",
        escape(&draft.description)
    );
    if !view.server_key {
        body.push_str(
            "<label for=\"api_key\">Groq API Key</label>\
             <input type=\"password\" id=\"api_key\" name=\"api_key\" placeholder=\"gsk_...\" autocomplete=\"off\">",
        );
    }
    body.push_str(
        "<div class=\"actions\"><button class=\"primary\" type=\"submit\">Evaluate with AI</button>\
         <button type=\"submit\" formaction=\"/clear\">Clear Form</button></div>\n</form>\n",
    );
    page("Evaluate Use Case", &body)
}

fn select(name: &str, label: &str, options: &[&str], current: &str) -> String {
    let mut html = format!(
        "<label for=\"{name}\">{label}</label><select id=\"{name}\" name=\"{name}\">\
         <option value=\"\">Select...</option>",
        label = escape(label)
    );
    let mut matched = current.is_empty();
    for option in options {
        let selected = if *option == current {
            matched = true;
            " selected"
        } else {
            ""
        };
        let _ = write!(
            html,
            "<option value=\"{0}\"{1}>{0}</option>",
            escape(option),
            selected
        );
    }
    if !matched {
        let _ = write!(html, "<option value=\"{0}\" selected>{0}</option>", escape(current));
    }
    html.push_str("</select>");
    html
}

fn checkboxes(name: &str, label: &str, options: &[&str], current: &[String]) -> String {
    let mut html = format!("<fieldset><legend>{}</legend>", escape(label));
    let extra = current
        .iter()
        .map(String::as_str)
        .filter(|value| !options.contains(value));
    for option in options.iter().copied().chain(extra) {
        let checked = if current.iter().any(|value| value == option) {
            " checked"
        } else {
            ""
        };
        let _ = write!(
            html,
            "<label><input type=\"checkbox\" name=\"{name}\" value=\"{0}\"{1}> {0}</label>",
            escape(option),
            checked
        );
    }
    html.push_str("</fieldset>");
    html
}

pub(crate) fn results_page(evaluation: Option<&Evaluation>) -> String {
    let Some(evaluation) = evaluation else {
        return page(
            "Results",
            "<div class=\"banner info\">Enter a use case in the Evaluate Use Case tab and \
             submit it to see results here.</div>",
        );
    };
    let assessment = &evaluation.assessment;
    let use_case = &evaluation.use_case;
    let mut body = String::new();

    let _ = write!(
        body,
        "<h2>{}</h2><p class=\"muted\">{} &middot; evaluated {}</p>",
        escape(use_case.name()),
        escape(use_case.department()),
        escape(&evaluation.generated_at)
    );
    let _ = write!(
        body,
        "<div class=\"score-card\"><div><div class=\"score-value\">{}</div>\
         <div class=\"score-label\">Overall Score</div></div>\
         <div><div class=\"score-value\" style=\"font-size: 2rem\">{}</div>\
         <div class=\"score-label\">Risk Level</div></div></div>",
        assessment.overall_score(),
        assessment.risk_level()
    );

    let _ = write!(
        body,
        "<h3>Executive Summary</h3><div class=\"banner info\">{}</div>",
        escape(assessment.executive_summary())
    );

    body.push_str("<h3>Risk Assessment</h3><div class=\"grid\">");
    for (dimension, risk) in assessment.risks().iter() {
        let _ = write!(
            body,
            "<div class=\"card\"><h4>{}{}</h4><p>Score: {}/100</p><p>{}</p>",
            escape(dimension.title()),
            badge(risk.level),
            risk.score,
            escape(&risk.summary)
        );
        if !risk.details.is_empty() {
            let _ = write!(body, "<p><strong>{}</strong></p><ul>", escape(dimension.details_title()));
            for detail in &risk.details {
                let _ = write!(body, "<li>{}</li>", escape(detail));
            }
            body.push_str("</ul>");
        }
        body.push_str("</div>");
    }
    body.push_str("</div>");

    body.push_str("<h3>Applicable Regulations</h3>");
    if assessment.applicable_regulations().is_empty() {
        body.push_str("<p class=\"muted\">None identified.</p>");
    } else {
        body.push_str("<ul>");
        for regulation in assessment.applicable_regulations() {
            let _ = write!(body, "<li>{}</li>", escape(regulation));
        }
        body.push_str("</ul>");
    }

    body.push_str("<h3>Recommended Actions</h3>");
    if assessment.recommended_actions().is_empty() {
        body.push_str("<p>No specific actions recommended.</p>");
    } else {
        for action in assessment.recommended_actions() {
            let _ = write!(
                body,
                "<div class=\"action-item\"><strong>{}:</strong> {}",
                action.priority_label(),
                escape(&action.action)
            );
            if let Some(regulation) = &action.regulation {
                let _ = write!(body, "<br><em>{}</em>", escape(regulation));
            }
            let owner = action.owner.as_deref().unwrap_or("TBD");
            let _ = write!(body, " &rarr; <strong>Owner:</strong> {}</div>", escape(owner));
        }
    }

    body.push_str(
        "<h3>Export Report</h3><div class=\"actions\">\
         <a href=\"/report.pdf\"><button type=\"button\">Download PDF Report</button></a>\
         <a href=\"/report.json\"><button type=\"button\">Download JSON</button></a>\
         <form method=\"post\" action=\"/clear\"><button type=\"submit\">New Evaluation</button></form>\
         </div>",
    );
    page("Results", &body)
}

pub(crate) fn error_page(title: &str, message: &str) -> String {
    let body = format!(
        "<div class=\"banner error\"><strong>{}</strong><br>{}</div>\
         <p><a href=\"/results\">Back to results</a></p>",
        escape(title),
        escape(message)
    );
    page(title, &body)
}
