//! Report documents.
//!
//! Renders a report as a standalone Markdown document laid out like the
//! printed lab report: header, sample and client blocks, result tables,
//! conclusions, signatures, footer. Used by `export`.

use crate::error::Result;
use crate::model::Report;
use minijinja::{context, Environment};

const DOCUMENT_TEMPLATE: &str = r#"# {{ lab_name }} Report

## {{ report.title }}

Status: **{{ status }}**

### Report Details

- Report date: {{ report.date }}
- Sample ID: {{ report.sampleId }}
- Sample type: {{ report.sampleType }}

### Client

- Name: {{ report.client.name }}
{% if report.client.institution %}
- Institution: {{ report.client.institution }}
{% endif %}
- Email: {{ report.client.email }}
{% if report.client.phone %}
- Phone: {{ report.client.phone }}
{% endif %}
{% if report.client.address %}
- Address: {{ report.client.address }}
{% endif %}

### Sample Information

- Collection date: {{ report.collectionDate }}
- Analysis date: {{ report.analysisDate }}
{% if report.sampleDescription %}

{{ report.sampleDescription }}
{% endif %}

### Microbiological Analysis Results

{% if report.microorganisms %}
| Microorganism | Count | Unit |
|---|---:|---|
{% for m in report.microorganisms %}
| {{ m.name|cell }} | {{ m.count }} | {{ m.unit|cell }} |
{% endfor %}
{% else %}
No microorganisms recorded.
{% endif %}
{% if report.additionalTests %}

#### Additional Tests

| Test | Result | Normal Range | Interpretation |
|---|---|---|---|
{% for t in report.additionalTests %}
| {{ t.testName|cell }} | {{ t.result|default("-")|cell }} | {{ t.normalRange|default("-")|cell }} | {{ t.interpretation|default("-")|cell }} |
{% endfor %}
{% endif %}

### Conclusions

{{ report.conclusion }}
{% if report.recommendations %}

#### Recommendations

{{ report.recommendations }}
{% endif %}

### Signatures

- Analyst: {{ report.analyst }}
{% if report.supervisor %}
- Supervisor: {{ report.supervisor }}
{% endif %}
{% if report.notes %}

_{{ report.notes }}_
{% endif %}

---

This report was generated by {{ lab_name }} Report System on {{ report.date }}.
"#;

fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_filter("cell", cell);
    env.add_template("document", DOCUMENT_TEMPLATE)?;
    Ok(env)
}

/// Table cells cannot hold pipes or line breaks.
fn cell(value: String) -> String {
    value.replace('|', "\\|").replace(['\r', '\n'], " ")
}

pub fn render_markdown(report: &Report, lab_name: &str) -> Result<String> {
    let env = environment()?;
    let template = env.get_template("document")?;
    let rendered = template.render(context! {
        report => report,
        lab_name => lab_name,
        status => report.status.label(),
    })?;
    Ok(rendered)
}

/// `Microbiology-Report-<sample id>.md`, with the sample id made path-safe.
pub fn file_name(report: &Report) -> String {
    format!("Microbiology-Report-{}.md", sanitize_filename(&report.sample_id))
}

pub(crate) fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}
