//! Terminal templates. Layout widths are computed in `render.rs`; these only
//! place the pieces and pick styles.
//!
//! Block tags sit at the start of the line they guard, so every line break in
//! the output is one written here.

pub const LIST_TEMPLATE: &str = r#"{% if empty %}No reports found.
{% else %}{% for r in reports %}  {{ r.short_id|style("id") }}  {{ r.title|style("title") }}{{ r.padding }}  {{ r.sample_type }}  {{ r.status|style(r.status_style) }}  {{ r.age|style("time") }}
{% endfor %}{% endif %}"#;

pub const DETAIL_TEMPLATE: &str = r#"{% if empty %}No reports found.
{% endif %}{% for e in entries %}{% if not loop.first %}
{{ separator }}

{% endif %}{{ e.report.title|style("title") }}  [{{ e.status|style(e.status_style) }}]
{{ "Id          "|style("label") }}{{ e.report.id }}
{{ "Date        "|style("label") }}{{ e.report.date }}
{{ "Sample      "|style("label") }}{{ e.report.sampleId }} ({{ e.report.sampleType }})
{{ "Collected   "|style("label") }}{{ e.report.collectionDate }}
{{ "Analyzed    "|style("label") }}{{ e.report.analysisDate }}
{% if e.report.sampleDescription %}{{ "Description "|style("label") }}{{ e.report.sampleDescription }}
{% endif %}
{{ "Client"|style("heading") }}
  {{ e.report.client.name }} <{{ e.report.client.email }}>
{% if e.report.client.institution %}  {{ e.report.client.institution }}
{% endif %}{% if e.report.client.phone %}  {{ e.report.client.phone }}
{% endif %}{% if e.report.client.address %}  {{ e.report.client.address }}
{% endif %}
{{ "Microorganisms"|style("heading") }}
{% for m in e.report.microorganisms %}  - {{ m.name }}: {{ m.count }} {{ m.unit }}
{% else %}  (none)
{% endfor %}{% if e.report.additionalTests %}
{{ "Additional tests"|style("heading") }}
{% for t in e.report.additionalTests %}  - {{ t.testName }}: {{ t.result }}{% if t.normalRange %} (normal {{ t.normalRange }}){% endif %}{% if t.interpretation %}, {{ t.interpretation }}{% endif %}
{% endfor %}{% endif %}
{{ "Conclusion"|style("heading") }}
  {{ e.report.conclusion }}
{% if e.report.recommendations %}{{ "Recommendations"|style("heading") }}
  {{ e.report.recommendations }}
{% endif %}
{{ "Analyst     "|style("label") }}{{ e.report.analyst }}
{% if e.report.supervisor %}{{ "Supervisor  "|style("label") }}{{ e.report.supervisor }}
{% endif %}{% if e.report.notes %}{{ "Notes       "|style("label") }}{{ e.report.notes }}
{% endif %}{% if e.missing %}{{ ("Missing before completion: " ~ (e.missing|join(", ")))|style("warning") }}
{% endif %}{% endfor %}"#;

pub const STATS_TEMPLATE: &str = r#"{{ "Reports"|style("heading") }} {{ total }}  {{ "draft"|style("status_draft") }} {{ draft }}  {{ "completed"|style("status_completed") }} {{ completed }}  {{ "sent"|style("status_sent") }} {{ sent }}{{ "\n" }}"#;

pub const CONFIG_TEMPLATE: &str = r#"{% for e in entries %}{{ e.key|style("label") }} = {{ e.value }}
{% endfor %}"#;

pub const MESSAGES_TEMPLATE: &str = r#"{% for m in messages %}{{ m.content|style(m.style) }}
{% endfor %}"#;
