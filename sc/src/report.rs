//! Telegram report builders
//!
//! Three daily texts (morning program, midday nudge, evening summary) plus
//! the two sync notices, all in MarkdownV2. Literal template lines carry
//! their escapes inline; every dynamic value and every pool line goes
//! through [`escape`]. Builders that pick a random line take the RNG as a
//! parameter so tests can seed it.

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::analyzer::{Analysis, ItemOrigin, PlannedItem};
use crate::diff::StateDiff;
use crate::domain::DayOfWeek;

/// MarkdownV2 metacharacters that must be backslash-escaped
const MARKDOWN_SPECIALS: [char; 18] = [
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Encouragement lines for completions (evening report, sync notices)
pub const MOTIVATIONS: [&str; 19] = [
    "Aferin! Bir görevi daha bitirdin, hedefine bir adım daha yaklaştın! 🚀",
    "Harikasın! Böyle devam et, başarı kaçınılmaz! 💪",
    "Süpersin! Disiplin, özgürlüktür. Özgürlüğüne koşuyorsun! 🏃‍♂️",
    "Tebrikler! Bir taş daha koydun duvarına. Sağlam ilerliyorsun! 🧱",
    "Helal olsun! Rakiplerin uyurken sen çalışıyorsun (ya da en azından görevi bitirdin)! 😉",
    "Mükemmel! Küçük adımlar büyük zaferlere götürür. Devam! 🔥",
    "Bravo! Azmin takdire şayan. Aynen böyle devam! ⭐",
    "Çok iyi gidiyorsun! Bu hızla AGS senin! 🏆",
    "Görev tamamlandı! Şimdi sırada ne var? 😎",
    "Durmak yok! Hızını almışken devamını getir! 🚄",
    "İşte bu! Başarı detaylarda gizlidir ve sen detayları hallediyorsun! 🧐",
    "Ders bırakılmaz, mola verilir. Mola bitti, derse dön! ⏳",
    "Gelecekteki sen sana teşekkür edecek. Şimdi çalışmaya devam et! 🙏",
    "En zor kısmı başlamaktı, sen zaten başladın. Bitirmeden kalkma! 🚫",
    "Bu konuyu halledersen akşam ne kadar rahat uyuyacağını düşün! 😴",
    "Rakiplerin yoruldu, sen devam edersen farkı şimdi açarsın! 🏃💨",
    "Sadece 1 saat daha odaklan, neler başarabileceğine şaşıracaksın! 🧠",
    "Hayallerin için ter dökmen gerekiyor. Bu terler, yarın gözyaşı olmasın! 💧",
    "Bugün ektiğin tohumlar yarın ağaç olacak. Sulamaya devam et! 🌳",
];

/// Prod lines for the midday check-in
pub const MIDDAY_NUDGES: [&str; 8] = [
    "Selam! Nasıl gidiyor? Bırakmadın değil mi? 👀",
    "Öğleden sonra rehaveti çökmesin! Bir kahve al ve masaya dön ☕",
    "Günün yarısı bitti, hedeflerin ne durumda? Hızlanma vakti! ⚡",
    "Şu an çalışıyor olman lazım, telefona bakıyor olman değil! 😉",
    "Mola bitti asker! Cepheye (masaya) geri dön! 🫡",
    "Bırakmak yok! Akşama gururlu bir rapor görmek istiyorum 📉📈",
    "Enerjin düşmesin, bitiş çizgisine daha var ama yolun yarısını geçtin! 🏁",
    "Şşşt! Daldın gittin, odaklan tekrar! 🔔",
];

const TURKISH_MONTHS: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül", "Ekim", "Kasım", "Aralık",
];

/// Backslash-escape every MarkdownV2 metacharacter in `text`
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_SPECIALS.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Pick a random encouragement line
pub fn random_motivation(rng: &mut impl Rng) -> &'static str {
    MOTIVATIONS.choose(rng).copied().unwrap_or(MOTIVATIONS[0])
}

/// Turkish long date: "10 Haziran 2024 Pazartesi"
fn turkish_date(date: NaiveDate) -> String {
    format!(
        "{} {} {} {}",
        date.day(),
        TURKISH_MONTHS[date.month0() as usize],
        date.year(),
        DayOfWeek::from_date(date).label()
    )
}

fn separator() -> String {
    "─".repeat(25)
}

/// Item title, with the owning playlist appended for videos
fn item_label(item: &PlannedItem) -> String {
    match &item.origin {
        ItemOrigin::Task => escape(&item.title),
        ItemOrigin::PlaylistVideo { playlist } => {
            format!("{} \\({}\\)", escape(&item.title), escape(playlist))
        }
    }
}

/// Morning program: overdue reckoning, today's goals, standing
///
/// Deterministic - the only report built without an RNG.
pub fn morning_report(analysis: &Analysis, today: NaiveDate) -> String {
    debug!(
        overdue = analysis.overdue.len(),
        due_today = analysis.due_today.len(),
        "morning_report: called"
    );

    let mut parts: Vec<String> = Vec::new();

    parts.push("📋 *AGS DİSİPLİN RAPORU*".into());
    parts.push(format!("📅 {}", escape(&turkish_date(today))));
    parts.push(separator());

    if !analysis.overdue.is_empty() {
        parts.push(String::new());
        parts.push("🛑 *DÜNÜN HESABI:*".into());
        parts.push(String::new());
        parts.push("_Dün şu görevleri yapmadan nasıl rahat uyudun?_".into());
        parts.push(String::new());

        for (i, item) in analysis.overdue.iter().enumerate() {
            parts.push(format!(
                "  {}\\. {} {} \\({}\\)",
                i + 1,
                item.kind.icon(),
                item_label(item),
                escape(&item.date.to_string())
            ));
        }

        parts.push(String::new());
        parts.push("⚠️ _Rakiplerin çalışırken sen bunları erteledin\\! AGS birinciliği böyle kazanılmaz\\!_".into());
        parts.push("💪 *Hemen bunları temizle\\!*".into());
    }

    let pending = analysis.pending_today();
    if !pending.is_empty() {
        parts.push(String::new());
        parts.push(separator());
        parts.push(String::new());
        parts.push("🚀 *BUGÜNÜN HEDEFİ:*".into());
        parts.push(String::new());
        parts.push("_Bugün mazeret yok\\. Masaya otur ve şunları bitir:_".into());
        parts.push(String::new());

        for (i, item) in pending.iter().enumerate() {
            let subject_tag = match (&item.origin, &item.subject) {
                (ItemOrigin::Task, Some(subject)) => format!(" \\[{}\\]", escape(subject)),
                _ => String::new(),
            };
            parts.push(format!(
                "  {}\\. {} {}{}",
                i + 1,
                item.kind.icon(),
                item_label(item),
                subject_tag
            ));
        }

        parts.push(String::new());
        parts.push("🔥 _Akşam kontrol edeceğim, eksiksiz istiyorum\\!_".into());
    }

    if !analysis.done_today.is_empty() {
        parts.push(String::new());
        parts.push(format!("✅ Bugün tamamlanan: *{}* görev", analysis.done_today.len()));
    }

    if analysis.overdue.is_empty() && pending.is_empty() {
        parts.push(String::new());
        parts.push("✅ *Harika gidiyorsun\\!*".into());
        parts.push(String::new());

        if analysis.is_empty_day() {
            parts.push("📭 Bugün için tanımlı görev yok\\.".into());
            parts.push("_Ama boş durma\\! Gir uygulamaya, plan yap\\._".into());
        } else {
            parts.push("🎯 Tüm görevlerin tamamlanmış\\!".into());
            parts.push("_Ritmi bozma, yarın da aynı disiplinle devam\\!_".into());
        }
    }

    parts.push(String::new());
    parts.push(separator());
    parts.push("🤖 _AGS Disiplin Botu_".into());

    parts.join("\n")
}

/// Midday check-in: a random prod plus the remaining count
///
/// Returns `None` when nothing is left to do today - no nudge is sent.
pub fn midday_nudge(analysis: &Analysis, rng: &mut impl Rng) -> Option<String> {
    let remaining = analysis.pending_count();
    debug!(remaining, "midday_nudge: called");
    if remaining == 0 {
        return None;
    }

    let nudge = MIDDAY_NUDGES.choose(rng).copied().unwrap_or(MIDDAY_NUDGES[0]);
    Some(format!(
        "{}\n\n📌 *Kalan Görev:* {} adet",
        escape(nudge),
        remaining
    ))
}

/// Evening summary: what got done, what rolls over
///
/// Returns `None` when nothing at all was planned for today - no report is
/// sent on empty days.
pub fn evening_report(analysis: &Analysis, today: NaiveDate, rng: &mut impl Rng) -> Option<String> {
    debug!(
        done_today = analysis.done_today.len(),
        due_today = analysis.due_today.len(),
        "evening_report: called"
    );

    if analysis.is_empty_day() {
        return None;
    }

    let mut parts: Vec<String> = Vec::new();

    parts.push("🌙 *GÜN SONU RAPORU*".into());
    parts.push(format!("📅 {}", escape(&turkish_date(today))));
    parts.push(separator());

    let done_tasks = analysis.done_today.iter().filter(|i| i.is_task()).count();
    let done_videos = analysis.done_today.len() - done_tasks;
    let total_done = analysis.done_today.len();
    let total_left = analysis.pending_count();

    if total_done > 0 {
        parts.push(String::new());
        parts.push("✅ *BUGÜN NELER YAPILDI?*".into());
        parts.push(format!("Toplam {} görev/video tamamlandı\\.", total_done));

        if done_tasks > 0 {
            parts.push(format!("\\- {} Görev", done_tasks));
        }
        if done_videos > 0 {
            parts.push(format!("\\- {} Video", done_videos));
        }

        parts.push(String::new());
        parts.push(escape(random_motivation(rng)));
    } else {
        parts.push(String::new());
        parts.push("❌ *BUGÜN HİÇBİR ŞEY YAPILMADI MI?*".into());
        parts.push("_Yarın bunun telafisi şart\\!_".into());
    }

    if total_left > 0 {
        parts.push(String::new());
        parts.push("⚠️ *YARINA KALANLAR:*".into());
        parts.push(format!("Toplam {} eksik var\\.", total_left));
        parts.push("_Bunları yarın ilk iş olarak halletmelisin\\._".into());
    }

    parts.push(String::new());
    parts.push(separator());
    parts.push("😴 _İyi geceler, yarın daha güçlü başla\\!_".into());

    Some(parts.join("\n"))
}

/// "New additions" sync notice, listing added tasks and playlists
///
/// Returns `None` when the diff contains no additions.
pub fn addition_notice(diff: &StateDiff) -> Option<String> {
    if diff.added_tasks.is_empty() && diff.added_playlists.is_empty() {
        return None;
    }

    let mut parts: Vec<String> = Vec::new();
    parts.push("🆕 *YENİ EKLEME VAR\\!*".into());

    for task in &diff.added_tasks {
        parts.push(format!("📌 Görev: _{}_", escape(&task.title)));
    }
    for playlist in &diff.added_playlists {
        parts.push(format!("📺 Playlist: _{}_", escape(&playlist.name)));
    }

    parts.push(String::new());
    parts.push("Plan yapmak başarının yarısıdır\\. Hadi başlayalım\\! 🚀".into());

    Some(parts.join("\n"))
}

/// Completion sync notice with an encouragement line
///
/// Returns `None` when nothing was newly completed.
pub fn completion_notice(diff: &StateDiff, rng: &mut impl Rng) -> Option<String> {
    let count = diff.completed_tasks.len() + diff.watched_videos.len();
    if count == 0 {
        return None;
    }

    Some(format!(
        "🎯 {} görev/video tamamlandı\\!\n\n{}",
        count,
        escape(random_motivation(rng))
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::domain::{AppState, Playlist, Task, TaskKind, Video, VideoKind};
    use chrono::Utc;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Every metacharacter outside the bold/italic markers the templates
    /// use on purpose must sit right behind a backslash
    fn assert_fully_escaped(text: &str) {
        let chars: Vec<char> = text.chars().collect();
        for (i, c) in chars.iter().enumerate() {
            if MARKDOWN_SPECIALS.contains(c) && *c != '*' && *c != '_' {
                assert!(i > 0 && chars[i - 1] == '\\', "unescaped '{}' at {} in: {}", c, i, text);
            }
        }
    }

    // === ESCAPING ===

    #[test]
    fn test_escape_specials() {
        assert_eq!(escape("a.b!c"), "a\\.b\\!c");
        assert_eq!(escape("(2024-06-10)"), "\\(2024\\-06\\-10\\)");
        assert_eq!(escape("_italik_ *kalın*"), "\\_italik\\_ \\*kalın\\*");
        assert_eq!(escape("Türkçe karakterler sağlam"), "Türkçe karakterler sağlam");
    }

    proptest! {
        #[test]
        fn prop_escape_leaves_no_unescaped_special(s in "\\PC*") {
            let escaped = escape(&s);
            let chars: Vec<char> = escaped.chars().collect();
            for (i, c) in chars.iter().enumerate() {
                if MARKDOWN_SPECIALS.contains(c) {
                    prop_assert!(i > 0 && chars[i - 1] == '\\');
                }
            }
        }

        #[test]
        fn prop_escape_preserves_content(s in "[0-9a-zA-ZçğıöşüÇĞİÖŞÜ _*\\[\\]()~`>#+=|{}.!-]*") {
            let stripped: String = escape(&s)
                .chars()
                .scan(false, |skipping, c| {
                    if !*skipping && c == '\\' {
                        *skipping = true;
                        Some(None)
                    } else {
                        *skipping = false;
                        Some(Some(c))
                    }
                })
                .flatten()
                .collect();
            prop_assert_eq!(stripped, s);
        }
    }

    // === FIXTURES ===

    fn busy_state(today: NaiveDate) -> AppState {
        let mut state = AppState::default();
        state.tasks.push(
            Task::with_id("t1", "Paragraf denemesi", TaskKind::Question, date(2024, 6, 9)).with_subject("Türkçe"),
        );
        state
            .tasks
            .push(Task::with_id("t2", "Tarih özeti", TaskKind::Review, today).with_subject("Tarih"));
        let mut done = Task::with_id("t3", "Mevzuat okuması", TaskKind::Other, today);
        done.completed = true;
        state.tasks.push(done);

        let mut playlist = Playlist::new("Analiz Kampı", Utc::now());
        playlist.videos.push(Video {
            id: "v1".into(),
            title: "Limit 1".into(),
            duration: 25,
            watched: false,
            url: None,
            thumbnail: None,
            kind: VideoKind::Lecture,
            subject: None,
            topic: None,
            assigned_date: Some(today),
            playlist_id: Some(playlist.id.clone()),
        });
        state.playlists.push(playlist);
        state
    }

    // === MORNING ===

    #[test]
    fn test_morning_report_structure() {
        let today = date(2024, 6, 10);
        let analysis = analyze(&busy_state(today), today);
        let report = morning_report(&analysis, today);

        assert!(report.starts_with("📋 *AGS DİSİPLİN RAPORU*"));
        assert!(report.contains("📅 10 Haziran 2024 Pazartesi"));
        assert!(report.contains("🛑 *DÜNÜN HESABI:*"));
        assert!(report.contains("  1\\. ✏️ Paragraf denemesi \\(2024\\-06\\-09\\)"));
        assert!(report.contains("🚀 *BUGÜNÜN HEDEFİ:*"));
        assert!(report.contains("  1\\. 🔄 Tarih özeti \\[Tarih\\]"));
        assert!(report.contains("  2\\. 📺 Limit 1 \\(Analiz Kampı\\)"));
        assert!(report.contains("✅ Bugün tamamlanan: *1* görev"));
        assert!(report.ends_with("🤖 _AGS Disiplin Botu_"));
        assert_fully_escaped(&report);
    }

    #[test]
    fn test_morning_report_empty_day() {
        let today = date(2024, 6, 10);
        let analysis = analyze(&AppState::default(), today);
        let report = morning_report(&analysis, today);

        assert!(report.contains("✅ *Harika gidiyorsun\\!*"));
        assert!(report.contains("📭 Bugün için tanımlı görev yok\\."));
        assert!(!report.contains("DÜNÜN HESABI"));
    }

    #[test]
    fn test_morning_report_all_done() {
        let today = date(2024, 6, 10);
        let mut state = AppState::default();
        let mut task = Task::with_id("t1", "Biten iş", TaskKind::Other, today);
        task.completed = true;
        state.tasks.push(task);

        let report = morning_report(&analyze(&state, today), today);
        assert!(report.contains("🎯 Tüm görevlerin tamamlanmış\\!"));
        assert!(!report.contains("BUGÜNÜN HEDEFİ"));
    }

    #[test]
    fn test_morning_report_deterministic() {
        let today = date(2024, 6, 10);
        let analysis = analyze(&busy_state(today), today);
        assert_eq!(morning_report(&analysis, today), morning_report(&analysis, today));
    }

    // === MIDDAY ===

    #[test]
    fn test_midday_nudge_counts_remaining() {
        let today = date(2024, 6, 10);
        let analysis = analyze(&busy_state(today), today);
        let mut rng = StdRng::seed_from_u64(7);

        let nudge = midday_nudge(&analysis, &mut rng).unwrap();
        assert!(nudge.contains("📌 *Kalan Görev:* 2 adet"));
        assert_fully_escaped(&nudge);
    }

    #[test]
    fn test_midday_nudge_skipped_when_clear() {
        let analysis = analyze(&AppState::default(), date(2024, 6, 10));
        let mut rng = StdRng::seed_from_u64(7);
        assert!(midday_nudge(&analysis, &mut rng).is_none());
    }

    // === EVENING ===

    #[test]
    fn test_evening_report_splits_done_counts() {
        let today = date(2024, 6, 10);
        let mut state = busy_state(today);
        // watch the playlist video so both kinds show up as done
        state.playlists[0].videos[0].watched = true;

        let mut rng = StdRng::seed_from_u64(7);
        let report = evening_report(&analyze(&state, today), today, &mut rng).unwrap();

        assert!(report.starts_with("🌙 *GÜN SONU RAPORU*"));
        assert!(report.contains("Toplam 2 görev/video tamamlandı\\."));
        assert!(report.contains("\\- 1 Görev"));
        assert!(report.contains("\\- 1 Video"));
        assert!(report.contains("⚠️ *YARINA KALANLAR:*"));
        assert!(report.contains("Toplam 1 eksik var\\."));
        assert_fully_escaped(&report);
    }

    #[test]
    fn test_evening_report_nothing_done() {
        let today = date(2024, 6, 10);
        let mut state = AppState::default();
        state.tasks.push(Task::with_id("t1", "Kalan", TaskKind::Other, today));

        let mut rng = StdRng::seed_from_u64(7);
        let report = evening_report(&analyze(&state, today), today, &mut rng).unwrap();
        assert!(report.contains("❌ *BUGÜN HİÇBİR ŞEY YAPILMADI MI?*"));
        assert!(report.contains("_Yarın bunun telafisi şart\\!_"));
    }

    #[test]
    fn test_evening_report_skipped_on_empty_day() {
        let mut state = AppState::default();
        // only overdue work, nothing dated today
        state.tasks.push(Task::with_id("t1", "Eski", TaskKind::Other, date(2024, 6, 1)));

        let mut rng = StdRng::seed_from_u64(7);
        assert!(evening_report(&analyze(&state, date(2024, 6, 10)), date(2024, 6, 10), &mut rng).is_none());
    }

    #[test]
    fn test_evening_report_seeded_rng_is_stable() {
        let today = date(2024, 6, 10);
        let analysis = analyze(&busy_state(today), today);

        let a = evening_report(&analysis, today, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = evening_report(&analysis, today, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    // === SYNC NOTICES ===

    #[test]
    fn test_addition_notice_lists_titles() {
        let mut diff = StateDiff::default();
        diff.added_tasks
            .push(Task::with_id("t2", "Yeni görev!", TaskKind::Other, date(2024, 6, 10)));
        diff.added_playlists.push(Playlist::new("Geometri Serisi", Utc::now()));

        let notice = addition_notice(&diff).unwrap();
        assert!(notice.starts_with("🆕 *YENİ EKLEME VAR\\!*"));
        assert!(notice.contains("📌 Görev: _Yeni görev\\!_"));
        assert!(notice.contains("📺 Playlist: _Geometri Serisi_"));
    }

    #[test]
    fn test_completion_notice_counts_both_namespaces() {
        let mut diff = StateDiff::default();
        diff.completed_tasks
            .push(Task::with_id("t1", "Biten", TaskKind::Other, date(2024, 6, 10)));
        diff.watched_videos.push(Video {
            id: "v1".into(),
            title: "Limit 1".into(),
            duration: 25,
            watched: true,
            url: None,
            thumbnail: None,
            kind: VideoKind::Lecture,
            subject: None,
            topic: None,
            assigned_date: None,
            playlist_id: None,
        });

        let mut rng = StdRng::seed_from_u64(7);
        let notice = completion_notice(&diff, &mut rng).unwrap();
        assert!(notice.starts_with("🎯 2 görev/video tamamlandı\\!"));
        assert_fully_escaped(&notice);
    }

    #[test]
    fn test_notices_none_on_empty_diff() {
        let diff = StateDiff::default();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(addition_notice(&diff).is_none());
        assert!(completion_notice(&diff, &mut rng).is_none());
    }
}
