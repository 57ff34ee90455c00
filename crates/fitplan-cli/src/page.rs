//! The single HTML page served at `/`.
//!
//! The page is rendered from the current form state. After load, a small
//! script sends each control change to `POST /api/form` and redraws from the
//! returned view; only the Generate button calls `POST /api/generate`.

use std::fmt::Write as _;
use std::ops::RangeInclusive;

use fitplan_core::form::{Field, FormView};
use fitplan_core::pipeline::PlanResponse;
use fitplan_core::profile::{
    AGE_RANGE, ActivityLevel, Gender, HEIGHT_CM_RANGE, Objective, TRAINING_SESSIONS_RANGE,
    WEEKS_RANGE, WEIGHT_KG_RANGE,
};

pub const TITLE: &str = "App for generating training and nutrition plans";
pub const SUBTITLE: &str = "Generate your personalized plan";
pub const SPINNER_TEXT: &str = "Generation in progress...";

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 880px; margin: 0 auto; padding: 24px; color: #1a1a1a; }
.row { margin: 12px 0; }
.row label { display: block; font-weight: 600; margin-bottom: 4px; }
.row output { margin-left: 8px; }
#notice { margin: 12px 0; padding: 8px 12px; border-radius: 6px; }
#notice.success { background: #e6f4ea; color: #1e4620; }
#notice.error { background: #fdecea; color: #611a15; }
#spinner { color: #555; }
#output table { border-collapse: collapse; margin: 12px 0; }
#output th, #output td { border: 1px solid #ccc; padding: 4px 8px; text-align: left; }
"#;

const SCRIPT: &str = r#"
const form = document.getElementById('plan-form');
const button = document.getElementById('generate');
const spinner = document.getElementById('spinner');
const output = document.getElementById('output');
const notice = document.getElementById('notice');

function showNotice(kind, text) {
  notice.className = kind;
  notice.textContent = text;
  notice.hidden = false;
}

function apply(view) {
  for (const [name, value] of Object.entries(view.values)) {
    const el = form.elements[name];
    if (el && el !== document.activeElement) el.value = value;
    const out = document.getElementById(name + '-value');
    if (out) out.textContent = value;
  }
  document.getElementById('target_weight_kg-row').hidden = !view.show_target_weight;
  document.getElementById('weeks_to_goal-row').hidden = !view.show_weeks_to_goal;
}

async function update(field, value) {
  const res = await fetch('/api/form', {
    method: 'POST',
    headers: { 'content-type': 'application/json' },
    body: JSON.stringify({ field, value }),
  });
  const body = await res.json();
  if (!res.ok) { showNotice('error', body.error); return; }
  apply(body);
}

// Field updates are chained so generate always sees the last edit.
let pending = Promise.resolve();
form.addEventListener('change', (e) => {
  if (!e.target.name) return;
  const { name, value } = e.target;
  pending = pending.then(() => update(name, value)).catch(() => {});
});
form.addEventListener('input', (e) => {
  const out = document.getElementById(e.target.name + '-value');
  if (out) out.textContent = e.target.value;
});

button.addEventListener('click', async () => {
  button.disabled = true;
  spinner.hidden = false;
  notice.hidden = true;
  try {
    await pending;
    const res = await fetch('/api/generate', { method: 'POST' });
    const body = await res.json();
    if (res.ok) {
      output.innerHTML = body.html;
      showNotice('success', body.notice);
    } else {
      showNotice('error', body.error);
    }
  } catch (_) {
    showNotice('error', 'Plan generation failed. Please try again.');
  } finally {
    spinner.hidden = true;
    button.disabled = false;
  }
});
"#;

fn select(out: &mut String, field: Field, label: &str, options: &[(&str, &str)], current: &str) {
    let name = field.name();
    let _ = write!(
        out,
        "<div class=\"row\" id=\"{name}-row\"><label for=\"{name}\">{label}</label><select id=\"{name}\" name=\"{name}\">"
    );
    for (id, text) in options {
        let selected = if *id == current { " selected" } else { "" };
        let _ = write!(out, "<option value=\"{id}\"{selected}>{text}</option>");
    }
    out.push_str("</select></div>");
}

fn slider(out: &mut String, field: Field, label: &str, range: &RangeInclusive<u32>, value: u32) {
    let name = field.name();
    let (min, max) = (range.start(), range.end());
    let _ = write!(
        out,
        "<div class=\"row\" id=\"{name}-row\"><label for=\"{name}\">{label}</label>\
<input type=\"range\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" step=\"1\" value=\"{value}\">\
<output id=\"{name}-value\">{value}</output></div>"
    );
}

fn number(
    out: &mut String,
    field: Field,
    label: &str,
    range: &RangeInclusive<u32>,
    value: u32,
    shown: bool,
) {
    let name = field.name();
    let (min, max) = (range.start(), range.end());
    let hidden = if shown { "" } else { " hidden" };
    let _ = write!(
        out,
        "<div class=\"row\" id=\"{name}-row\"{hidden}><label for=\"{name}\">{label}</label>\
<input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" step=\"1\" value=\"{value}\"></div>"
    );
}

/// Render the full page for the current form state and last plan.
pub fn render_page(view: &FormView, last_plan: Option<&PlanResponse>) -> String {
    let v = &view.values;
    let mut html = String::with_capacity(8192);

    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    let _ = write!(html, "<title>{TITLE}</title><style>{STYLE}</style></head><body>");
    let _ = write!(html, "<h1>{TITLE}</h1><h2>{SUBTITLE}</h2>");

    html.push_str("<form id=\"plan-form\" onsubmit=\"return false;\">");

    let genders: Vec<_> = Gender::ALL.iter().map(|g| (g.id(), g.label())).collect();
    select(&mut html, Field::Gender, "Select a gender", &genders, v.gender.id());
    slider(&mut html, Field::Age, "Select your age", &AGE_RANGE, v.age);
    number(
        &mut html,
        Field::HeightCm,
        "Enter your height (cm)",
        &HEIGHT_CM_RANGE,
        v.height_cm,
        true,
    );
    number(
        &mut html,
        Field::CurrentWeightKg,
        "Enter your weight (kg)",
        &WEIGHT_KG_RANGE,
        v.current_weight_kg,
        true,
    );
    let objectives: Vec<_> = Objective::ALL.iter().map(|o| (o.id(), o.label())).collect();
    select(
        &mut html,
        Field::Objective,
        "Select an objective",
        &objectives,
        v.objective.id(),
    );
    number(
        &mut html,
        Field::TargetWeightKg,
        "Enter the target weight (kg)",
        &WEIGHT_KG_RANGE,
        v.target_weight_kg,
        view.show_target_weight,
    );
    // Hidden under maintenance, where the snapshot carries 0.
    number(
        &mut html,
        Field::WeeksToGoal,
        "Enter the number of weeks to reach your goal",
        &WEEKS_RANGE,
        v.weeks_to_goal.max(*WEEKS_RANGE.start()),
        view.show_weeks_to_goal,
    );
    slider(
        &mut html,
        Field::TrainingSessionsPerWeek,
        "Number of training sessions per week",
        &TRAINING_SESSIONS_RANGE,
        v.training_sessions_per_week,
    );
    let levels: Vec<_> = ActivityLevel::ALL
        .iter()
        .map(|a| (a.id(), a.label()))
        .collect();
    select(
        &mut html,
        Field::ActivityLevel,
        "Select your level of physical activity",
        &levels,
        v.activity_level.id(),
    );
    html.push_str("</form>");

    html.push_str("<button type=\"button\" id=\"generate\">Generate Plans</button>");
    let _ = write!(html, "<p id=\"spinner\" hidden>{SPINNER_TEXT}</p>");
    html.push_str("<div id=\"notice\" hidden></div>");

    // Model output is inserted as-is.
    html.push_str("<div id=\"output\">");
    if let Some(plan) = last_plan {
        html.push_str(&plan.html);
    }
    html.push_str("</div>");

    let _ = write!(html, "<script>{SCRIPT}</script></body></html>");
    html
}
