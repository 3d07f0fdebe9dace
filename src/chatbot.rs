//! Rule-based study companion.
//!
//! Replies are picked from canned lists by keyword category; the only state
//! is the transcript kept in `AppData::chatbot_history`.

use crate::models::{AppData, ChatMessage, Sender};
use crate::tasks::local_date;
use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

const QUOTES: &[&str] = &[
    "Every expert started as a beginner. Keep going! 💪",
    "Small efforts repeated every day add up to big results. 🔥",
    "Progress is progress, however small it looks today. ✨",
    "Great work comes from showing up again and again. 🌟",
    "Believe you can and you're already halfway there! 🚀",
];

const TIPS: &[&str] = &[
    "Try 25 minutes of focused work followed by a 5-minute break. ⏰",
    "Split big tasks into small steps; each one is easier to start. 📝",
    "Review new material within a day of learning it to help it stick. 🧠",
    "Drink some water and take regular breaks; a rested brain learns faster. 💧",
    "Quiz yourself instead of re-reading. Active recall beats passive review. 🎯",
    "Keep a study spot that is free from distractions. 📚",
    "Explain a topic to someone else; teaching is a great way to master it. 👥",
];

const QUESTIONS: &[&str] = &[
    "How are you feeling about your studies today? 😊",
    "What's your biggest challenge right now? 💪",
    "What are you most proud of this week? 🎉",
    "What would help you stay motivated today? 🌟",
    "What's one thing you want to finish today? 🎯",
    "How can I help you stay on track? 🤔",
    "Which topic are you most excited about right now? 📖",
];

const DEFAULT_REPLIES: &[&str] = &[
    "Interesting! Tell me more. 🤔",
    "I'm here to help! What would you like to know? 💭",
    "Good to hear from you! How can I help you stay motivated? 🌟",
    "Progress takes time, and you're doing great! 💪",
    "Good point! Keep pushing forward. 🚀",
];

const GREETING_WORDS: &[&str] = &["hi", "hello", "hey", "greetings"];
const FEELING_WORDS: &[&str] = &[
    "feeling", "feel", "good", "great", "bad", "tired", "stressed", "overwhelmed", "excited",
    "motivated",
];
const POSITIVE_WORDS: &[&str] = &["good", "great", "excited", "motivated", "amazing", "wonderful"];
const NEGATIVE_WORDS: &[&str] = &[
    "bad", "tired", "stressed", "overwhelmed", "difficult", "hard", "struggling",
];
const TASK_WORDS: &[&str] = &["task*", "assignment*", "homework", "deadline*", "due"];
const HELP_WORDS: &[&str] = &["help", "tip*", "advice", "suggest*", "how", "what should", "what can"];
const MOTIVATION_WORDS: &[&str] = &["motivat*", "encourag*", "inspir*", "quote*"];
const PROGRESS_WORDS: &[&str] = &["streak*", "progress", "stats", "how am i"];
const THANKS_WORDS: &[&str] = &["thank*", "appreciate*", "grateful"];

const FOLLOW_UP_CHANCE: f64 = 0.5;

/// Snapshot of the tracker the responder talks about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatContext {
    pub streak: u32,
    pub points: u64,
    pub today_count: usize,
    pub pending: usize,
    pub overdue: usize,
    pub completed: usize,
}

impl ChatContext {
    pub fn from_data_at<Tz: TimeZone>(data: &AppData, now: DateTime<Tz>) -> Self {
        let zone = now.timezone();
        let today = now.date_naive();
        let now = now.with_timezone(&Utc);
        let tasks = &data.tasks;

        Self {
            streak: data.streak.current,
            points: data.points,
            today_count: tasks
                .iter()
                .filter(|task| local_date(task.deadline, &zone) == today)
                .count(),
            pending: tasks.iter().filter(|task| !task.completed).count(),
            overdue: tasks.iter().filter(|task| task.is_overdue_at(now)).count(),
            completed: tasks.iter().filter(|task| task.completed).count(),
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

pub fn greeting(ctx: &ChatContext) -> String {
    let mut text = String::from("Hey there! 👋 I'm your Study Buddy! ");
    if ctx.streak > 0 {
        text.push_str(&format!(
            "🔥 You're on a {}-day streak. Keep it up! ",
            ctx.streak
        ));
    }
    if ctx.today_count > 0 {
        text.push_str(&format!(
            "You have {} task{} scheduled for today. ",
            ctx.today_count,
            plural(ctx.today_count)
        ));
    }
    text.push_str("How are you feeling about your studies today? 😊");
    text
}

pub fn respond<R: Rng + ?Sized>(message: &str, ctx: &ChatContext, rng: &mut R) -> String {
    let message = Message::new(message);

    if message.mentions(GREETING_WORDS) {
        return greeting(ctx);
    }

    if message.mentions(FEELING_WORDS) {
        if message.mentions(POSITIVE_WORDS) {
            return "That's fantastic! 🎉 Hold on to that energy. What's keeping you motivated? 💪"
                .to_string();
        }
        if message.mentions(NEGATIVE_WORDS) {
            return "Some days are tough. 😔 Take a deep breath; you've come this far. Want a study tip to get back on track? 🌟"
                .to_string();
        }
    }

    if message.mentions(TASK_WORDS) {
        return if ctx.overdue > 0 {
            format!(
                "You have {} overdue task{}. Let's tackle them one at a time, starting with the most urgent. 🚀",
                ctx.overdue,
                plural(ctx.overdue)
            )
        } else if ctx.pending > 0 {
            format!(
                "You have {} task{} pending. That's manageable; focus on one at a time. Want a study tip? 📚",
                ctx.pending,
                plural(ctx.pending)
            )
        } else {
            "You're all caught up with your tasks! 🎉 Excellent work! ✨".to_string()
        };
    }

    if message.mentions(HELP_WORDS) {
        return pick(TIPS, rng);
    }

    if message.mentions(MOTIVATION_WORDS) {
        return pick(QUOTES, rng);
    }

    if message.mentions(PROGRESS_WORDS) {
        return format!(
            "You're doing amazing! 🔥 {}-day streak, {} points, and {} completed task{}. 💪",
            ctx.streak,
            ctx.points,
            ctx.completed,
            plural(ctx.completed)
        );
    }

    if message.mentions(THANKS_WORDS) {
        return "You're welcome! 😊 Every step forward counts. Keep going! 🌟".to_string();
    }

    pick(DEFAULT_REPLIES, rng)
}

pub fn follow_up<R: Rng + ?Sized>(rng: &mut R) -> Option<String> {
    rng.gen_bool(FOLLOW_UP_CHANCE).then(|| pick(QUESTIONS, rng))
}

pub fn celebration<R: Rng + ?Sized>(title: &str, rng: &mut R) -> String {
    match rng.gen_range(0..3) {
        0 => format!("🎉 You just completed \"{title}\"! Keep the momentum going! 💪"),
        1 => format!("✨ \"{title}\" is done! You're on fire! 🔥"),
        _ => format!("🌟 Finished \"{title}\"! Every task brings you closer to your goals! 🚀"),
    }
}

/// Picks a celebration line for a finished task and adds it to the transcript.
pub fn celebrate<R: Rng + ?Sized>(
    history: &mut Vec<ChatMessage>,
    title: &str,
    rng: &mut R,
    now: DateTime<Utc>,
) -> String {
    let text = celebration(title, rng);
    history.push(message(&text, Sender::Bot, now));
    text
}

/// Records a user message and the bot's reply (plus an optional follow-up
/// question) in the transcript, returning the appended messages.
pub fn exchange<R: Rng + ?Sized>(
    history: &mut Vec<ChatMessage>,
    text: &str,
    ctx: &ChatContext,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Vec<ChatMessage> {
    let start = history.len();
    history.push(message(text.trim(), Sender::User, now));
    history.push(message(&respond(text, ctx, rng), Sender::Bot, now));
    if let Some(question) = follow_up(rng) {
        history.push(message(&question, Sender::Bot, now));
    }
    history[start..].to_vec()
}

/// Seeds an empty transcript with the greeting; returns whether it did.
pub fn seed_greeting(history: &mut Vec<ChatMessage>, ctx: &ChatContext, now: DateTime<Utc>) -> bool {
    if !history.is_empty() {
        return false;
    }
    history.push(message(&greeting(ctx), Sender::Bot, now));
    true
}

fn message(text: &str, sender: Sender, time: DateTime<Utc>) -> ChatMessage {
    ChatMessage {
        text: text.to_string(),
        sender,
        time,
    }
}

fn pick<R: Rng + ?Sized>(choices: &[&str], rng: &mut R) -> String {
    choices.choose(rng).copied().unwrap_or_default().to_string()
}

struct Message {
    text: String,
    words: Vec<String>,
}

impl Message {
    fn new(raw: &str) -> Self {
        let words: Vec<String> = raw
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            text: words.join(" "),
            words,
        }
    }

    /// `word*` matches by prefix, multi-word keywords match as phrases.
    fn mentions(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|keyword| {
            if let Some(prefix) = keyword.strip_suffix('*') {
                self.words.iter().any(|word| word.starts_with(prefix))
            } else if keyword.contains(' ') {
                self.text.contains(keyword)
            } else {
                self.words.iter().any(|word| word == keyword)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn ctx() -> ChatContext {
        ChatContext {
            streak: 4,
            points: 120,
            today_count: 2,
            pending: 3,
            overdue: 0,
            completed: 1,
        }
    }

    #[test]
    fn greeting_mentions_streak_and_today() {
        let text = greeting(&ctx());
        assert!(text.contains("4-day streak"));
        assert!(text.contains("2 tasks scheduled for today"));

        let quiet = greeting(&ChatContext::default());
        assert!(!quiet.contains("streak"));
        assert!(!quiet.contains("scheduled"));
    }

    #[test]
    fn greeting_words_match_whole_words_only() {
        assert_eq!(respond("Hello!", &ctx(), &mut rng()), greeting(&ctx()));
        assert_ne!(respond("I think so", &ctx(), &mut rng()), greeting(&ctx()));
    }

    #[test]
    fn feelings_split_positive_and_negative() {
        assert!(respond("feeling great today", &ctx(), &mut rng()).starts_with("That's fantastic"));
        assert!(respond("so stressed", &ctx(), &mut rng()).starts_with("Some days are tough"));
    }

    #[test]
    fn task_questions_report_counts() {
        let mut busy = ctx();
        busy.overdue = 1;
        assert!(respond("any assignments?", &busy, &mut rng()).contains("1 overdue task."));
        assert!(respond("what is due", &ctx(), &mut rng()).contains("3 tasks pending"));

        let idle = ChatContext::default();
        assert!(respond("my tasks", &idle, &mut rng()).contains("all caught up"));
    }

    #[test]
    fn help_and_motivation_pick_from_lists() {
        let tip = respond("any tips?", &ctx(), &mut rng());
        assert!(TIPS.contains(&tip.as_str()));
        let quote = respond("inspire me", &ctx(), &mut rng());
        assert!(QUOTES.contains(&quote.as_str()));
    }

    #[test]
    fn progress_summary() {
        let text = respond("show my streak", &ctx(), &mut rng());
        assert!(text.contains("4-day streak, 120 points, and 1 completed task."));
    }

    #[test]
    fn unknown_input_gets_default_reply() {
        let reply = respond("bananas", &ctx(), &mut rng());
        assert!(DEFAULT_REPLIES.contains(&reply.as_str()));
    }

    #[test]
    fn exchange_appends_user_then_bot() {
        let now = Utc::now();
        let mut history = Vec::new();
        let added = exchange(&mut history, "  thanks  ", &ctx(), &mut rng(), now);
        assert!(added.len() == 2 || added.len() == 3);
        assert_eq!(history, added);
        assert_eq!(history[0].sender, Sender::User);
        assert_eq!(history[0].text, "thanks");
        assert_eq!(history[1].sender, Sender::Bot);
        assert!(history[1].text.starts_with("You're welcome"));
    }

    #[test]
    fn greeting_seeds_only_empty_history() {
        let now = Utc::now();
        let mut history = Vec::new();
        assert!(seed_greeting(&mut history, &ctx(), now));
        assert!(!seed_greeting(&mut history, &ctx(), now));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn celebration_names_the_task() {
        assert!(celebration("Lab report", &mut rng()).contains("\"Lab report\""));
    }

    #[test]
    fn celebration_is_kept_in_history() {
        let now = Utc::now();
        let mut history = Vec::new();
        let text = celebrate(&mut history, "Lab report", &mut rng(), now);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].sender, Sender::Bot);
        assert_eq!(history[0].text, text);
    }
}
