//! Ordinal number words (`first`, `thirty-second`, `one hundred twenty-eighth`)

const ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const SCALES: [(u64, &str); 4] = [
    (1_000_000_000_000, "trillion"),
    (1_000_000_000, "billion"),
    (1_000_000, "million"),
    (1_000, "thousand"),
];

fn below_thousand(n: u64, out: &mut Vec<String>) {
    let hundreds = n / 100;
    let rest = n % 100;
    if hundreds > 0 {
        out.push(format!("{} hundred", ONES[hundreds as usize]));
    }
    if rest == 0 {
        return;
    }
    if rest < 20 {
        out.push(ONES[rest as usize].to_string());
    } else if rest % 10 == 0 {
        out.push(TENS[(rest / 10) as usize].to_string());
    } else {
        out.push(format!("{}-{}", TENS[(rest / 10) as usize], ONES[(rest % 10) as usize]));
    }
}

/// Cardinal words for `n`
pub fn cardinal(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }
    let mut parts = Vec::new();
    let mut rest = n;
    for (size, name) in SCALES {
        if rest >= size {
            let count = rest / size;
            if count >= 1000 {
                parts.push(cardinal(count));
            } else {
                below_thousand(count, &mut parts);
            }
            parts.push(name.to_string());
            rest %= size;
        }
    }
    below_thousand(rest, &mut parts);
    parts.join(" ")
}

/// Ordinal words for `n`
pub fn ordinal(n: u64) -> String {
    let words = cardinal(n);
    let split = words.rfind([' ', '-']).map(|i| i + 1).unwrap_or(0);
    let (head, last) = words.split_at(split);

    let last = match last {
        "one" => "first".to_string(),
        "two" => "second".to_string(),
        "three" => "third".to_string(),
        "five" => "fifth".to_string(),
        "eight" => "eighth".to_string(),
        "nine" => "ninth".to_string(),
        "twelve" => "twelfth".to_string(),
        word if word.ends_with('y') => format!("{}ieth", &word[..word.len() - 1]),
        word => format!("{word}th"),
    };
    format!("{head}{last}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_ordinals() {
        assert_eq!(ordinal(1), "first");
        assert_eq!(ordinal(3), "third");
        assert_eq!(ordinal(8), "eighth");
        assert_eq!(ordinal(12), "twelfth");
        assert_eq!(ordinal(13), "thirteenth");
        assert_eq!(ordinal(20), "twentieth");
    }

    #[test]
    fn test_compound_ordinals() {
        assert_eq!(ordinal(32), "thirty-second");
        assert_eq!(ordinal(64), "sixty-fourth");
        assert_eq!(ordinal(128), "one hundred twenty-eighth");
        assert_eq!(ordinal(1024), "one thousand twenty-fourth");
    }
}
