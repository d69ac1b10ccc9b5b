//! Word counting for mixed Arabic/Latin text

/// Arabic script blocks, including presentation forms
fn is_arabic(c: char) -> bool {
    matches!(
        c,
        '\u{0600}'..='\u{06FF}'
            | '\u{0750}'..='\u{077F}'
            | '\u{08A0}'..='\u{08FF}'
            | '\u{FB50}'..='\u{FDFF}'
            | '\u{FE70}'..='\u{FEFF}'
    )
}

/// Count runs of chars matching `pred`
fn count_runs(text: &str, pred: impl Fn(char) -> bool) -> usize {
    let mut count = 0;
    let mut in_run = false;
    for c in text.chars() {
        let hit = pred(c);
        if hit && !in_run {
            count += 1;
        }
        in_run = hit;
    }
    count
}

/// Arabic words plus Latin words.
///
/// Each script is counted on its own, so a token mixing both scripts counts
/// once per script. Digits and punctuation are not words.
pub fn word_count(text: &str) -> usize {
    count_runs(text, is_arabic) + count_runs(text, |c| c.is_ascii_alphabetic())
}
