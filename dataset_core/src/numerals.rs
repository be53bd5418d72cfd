//! Brazilian Portuguese (`pt_BR`) cardinal numbers.
//!
//! Covers the whole `u64` range using the short scale (`milhão`, `bilhão`,
//! `trilhão`, ...). Masculine forms are used throughout.

use std::num::ParseIntError;

const UNITS: [&str; 20] = [
    "zero", "um", "dois", "três", "quatro", "cinco", "seis", "sete", "oito", "nove",
    "dez", "onze", "doze", "treze", "catorze", "quinze", "dezesseis", "dezessete",
    "dezoito", "dezenove",
];

const TENS: [&str; 10] = [
    "", "", "vinte", "trinta", "quarenta", "cinquenta", "sessenta", "setenta", "oitenta",
    "noventa",
];

const HUNDREDS: [&str; 10] = [
    "", "cento", "duzentos", "trezentos", "quatrocentos", "quinhentos", "seiscentos",
    "setecentos", "oitocentos", "novecentos",
];

// (singular, plural) for 10^6, 10^9, ...
const SCALES: [(&str, &str); 5] = [
    ("milhão", "milhões"),
    ("bilhão", "bilhões"),
    ("trilhão", "trilhões"),
    ("quatrilhão", "quatrilhões"),
    ("quintilhão", "quintilhões"),
];

/// Expand a run of decimal digits (leading zeros allowed) into words.
///
/// Fails when the run is not plain ASCII digits or does not fit in a `u64`.
pub fn expand_digits(digits: &str) -> Result<String, ParseIntError> {
    let n: u64 = digits.parse()?;
    Ok(cardinal(n))
}

/// Spell out `n` as a pt-BR cardinal.
pub fn cardinal(n: u64) -> String {
    if n == 0 {
        return UNITS[0].to_string();
    }

    // Groups of three digits, lowest first.
    let mut groups = Vec::with_capacity(7);
    let mut rest = n;
    while rest > 0 {
        groups.push((rest % 1000) as u16);
        rest /= 1000;
    }

    let mut parts: Vec<(u16, String)> = Vec::new();
    for (scale, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            continue;
        }
        let words = match scale {
            0 => below_thousand(group),
            1 if group == 1 => "mil".to_string(),
            1 => format!("{} mil", below_thousand(group)),
            _ => {
                let (singular, plural) = SCALES[scale - 2];
                if group == 1 {
                    format!("um {singular}")
                } else {
                    format!("{} {plural}", below_thousand(group))
                }
            }
        };
        parts.push((group, words));
    }

    let last = parts.len() - 1;
    let mut out = String::new();
    for (i, (group, words)) in parts.iter().enumerate() {
        if i > 0 {
            if i == last && (*group < 100 || group % 100 == 0) {
                out.push_str(" e ");
            } else {
                out.push(' ');
            }
        }
        out.push_str(words);
    }
    out
}

fn below_thousand(n: u16) -> String {
    debug_assert!(n > 0 && n < 1000);
    if n == 100 {
        return "cem".to_string();
    }
    let hundreds = (n / 100) as usize;
    let rest = n % 100;
    match (hundreds, rest) {
        (0, r) => below_hundred(r),
        (h, 0) => HUNDREDS[h].to_string(),
        (h, r) => format!("{} e {}", HUNDREDS[h], below_hundred(r)),
    }
}

fn below_hundred(n: u16) -> String {
    if n < 20 {
        return UNITS[n as usize].to_string();
    }
    let tens = TENS[(n / 10) as usize];
    match n % 10 {
        0 => tens.to_string(),
        u => format!("{} e {}", tens, UNITS[u as usize]),
    }
}
