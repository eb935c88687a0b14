use regex::Regex;
use std::fmt::Write;
use std::sync::OnceLock;

use crate::models::{CheckIn, Goals, Profile};

/// Number of earlier check-ins quoted in the prompt.
pub const PROMPT_HISTORY_LEN: i64 = 3;

pub const SYSTEM_INSTRUCTION: &str = "You are THRSHLD, an expert strength and conditioning coach. \
Create personalized, safe and effective workout plans based on the user's goals \
and daily check-ins. Always prioritize proper form and progressive overload.";

fn format_kg(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}kg", value)
    } else {
        format!("{:.1}kg", value)
    }
}

fn profile_summary(profile: &Profile) -> String {
    let mut summary = format!("User: {}", profile.name);
    if let Some(age) = profile.age {
        let _ = write!(summary, ", Age: {}", age);
    }
    let _ = write!(
        summary,
        ", Experience: {}. Training {} days/week.",
        profile.experience_level.as_deref().unwrap_or("beginner"),
        profile.training_days_per_week.unwrap_or(3)
    );

    let maxes: Vec<String> = [
        ("Squat", profile.squat_1rm),
        ("Bench", profile.bench_1rm),
        ("Deadlift", profile.deadlift_1rm),
        ("Overhead Press", profile.overhead_press_1rm),
    ]
    .into_iter()
    .filter_map(|(lift, max)| max.map(|kg| format!("{} 1RM: {}", lift, format_kg(kg))))
    .collect();

    if !maxes.is_empty() {
        let _ = write!(summary, " {}.", maxes.join(", "));
    }
    summary
}

fn goal_summary(goals: &Goals) -> String {
    let mut summary = format!("Primary goal: {}.", goals.workout_goal);
    if !goals.compound_lifts.is_empty() {
        let _ = write!(summary, " Focuses on: {}.", goals.compound_lifts.join(", "));
    }
    if goals.include_running {
        summary.push_str(" Includes running.");
    }
    if goals.include_conditioning {
        summary.push_str(" Includes conditioning.");
    }
    summary
}

fn history_summary(recent: &[CheckIn]) -> String {
    let notes: Vec<String> = recent
        .iter()
        .filter_map(|check_in| {
            check_in
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|note| !note.is_empty())
                .map(|note| format!("- {}: {}", check_in.date, note))
        })
        .collect();

    if notes.is_empty() {
        "First workout".to_string()
    } else {
        notes.join("\n")
    }
}

/// User prompt for today's plan. `recent` holds the latest earlier check-ins,
/// newest first.
pub fn build_prompt(
    profile: Option<&Profile>,
    goals: &Goals,
    recent: &[CheckIn],
    status: &str,
) -> String {
    let mut context = String::new();
    if let Some(profile) = profile {
        context.push_str(&profile_summary(profile));
        context.push(' ');
    }
    context.push_str(&goal_summary(goals));

    let squat_reference = profile
        .and_then(|p| p.squat_1rm)
        .map(format_kg)
        .unwrap_or_else(|| "your max".to_string());

    format!(
        "Based on this user's check-in, create a personalized workout.\n\n\
{context}\n\n\
Recent check-ins:\n{history}\n\n\
User's Status Today: \"{status}\"\n\n\
Create a specific workout with:\n\
1. Warm-up (5-10 minutes)\n\
2. Main exercises with exact sets, reps, and weights \
(use their 1RM data for percentage-based programming)\n\
3. Cool-down\n\n\
Keep it concise and actionable. If they have 1RM data, use specific percentages \
(e.g., \"Squat: 3 sets of 5 reps at 85% of {squat_reference}\").\n\n\
Match the workout intensity to their current state.",
        context = context,
        history = history_summary(recent),
        status = status,
        squat_reference = squat_reference,
    )
}

fn numbered_item() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\n([1-3])\.").expect("static regex"))
}

/// Normalizes a generated plan for display: items 1-3 start a new paragraph,
/// runs of blank lines collapse to one, lines are trimmed.
pub fn format_workout_response(reply: &str) -> String {
    let spaced = numbered_item().replace_all(reply.trim(), "\n\n$1.");

    let mut lines: Vec<&str> = Vec::new();
    for line in spaced.lines().map(str::trim) {
        if !line.is_empty() {
            lines.push(line);
        } else if lines.last().is_some_and(|previous| !previous.is_empty()) {
            lines.push("");
        }
    }

    lines.join("\n")
}
