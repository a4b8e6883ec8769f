//! Built-in replacement value generator.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::error::{DumpError, Result};

use super::{GeneratorRef, ValueGenerator};

const FIRST_NAMES: &[&str] = &[
    "Anna", "Ben", "Clara", "David", "Elena", "Felix", "Greta", "Henry", "Ida", "Jonas", "Katja",
    "Lukas", "Marie", "Nils", "Olivia", "Paul", "Rosa", "Simon", "Thea", "Victor",
];

const LAST_NAMES: &[&str] = &[
    "Abel", "Bauer", "Carlsen", "Dietrich", "Engel", "Fischer", "Graf", "Hoffmann", "Jansen",
    "Keller", "Lehmann", "Maier", "Neumann", "Otto", "Peters", "Richter", "Schmidt", "Vogel",
    "Weber", "Ziegler",
];

const STREET_NAMES: &[&str] = &[
    "Main Street", "Oak Avenue", "Park Road", "Station Road", "Mill Lane", "Church Street",
    "High Street", "Garden Way", "Bridge Street", "Market Square",
];

const CITIES: &[&str] = &[
    "Springfield", "Riverton", "Lakewood", "Fairview", "Georgetown", "Ashland", "Milton",
    "Clayton", "Dayton", "Oakdale",
];

const COUNTRIES: &[&str] = &[
    "Germany", "France", "Spain", "Italy", "Netherlands", "Austria", "Belgium", "Denmark",
    "Sweden", "Poland",
];

const COMPANIES: &[&str] = &[
    "Acme Corp", "Globex", "Initech", "Umbrella Ltd", "Stark Industries", "Wayne Enterprises",
    "Hooli", "Vandelay Industries", "Wonka Works", "Cyberdyne Systems",
];

const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "amet", "consectetur", "adipiscing", "elit", "tempor", "incididunt",
    "labore", "magna", "aliqua", "veniam", "nostrud", "ullamco", "laboris", "aliquip", "commodo",
];

const SAFE_DOMAINS: &[&str] = &["example.com", "example.org", "example.net"];

/// How often the `unique` modifier retries before giving up on a method
/// whose value space is exhausted.
const MAX_UNIQUE_RETRIES: usize = 10_000;

/// Default generator backed by static word lists and a thread-local RNG.
///
/// Method names are matched ignoring case and underscores, so
/// `FAKER_firstName` and `FAKER_first_name` resolve to the same generator.
/// The `unique` modifier remembers every value handed out per method and
/// retries until an unseen one appears.
pub struct BuiltinGenerator {
    issued: Mutex<HashMap<String, HashSet<String>>>,
}

impl BuiltinGenerator {
    /// Create a new generator with empty uniqueness memory.
    pub fn new() -> Self {
        Self {
            issued: Mutex::new(HashMap::new()),
        }
    }

    fn generate_once(&self, reference: &GeneratorRef) -> Result<String> {
        let mut rng = rand::thread_rng();
        let args = &reference.args;

        let value = match normalize(&reference.method).as_str() {
            "firstname" => pick(&mut rng, FIRST_NAMES),
            "lastname" => pick(&mut rng, LAST_NAMES),
            "name" => format!("{} {}", pick(&mut rng, FIRST_NAMES), pick(&mut rng, LAST_NAMES)),
            "username" => format!(
                "{}.{}{}",
                pick(&mut rng, FIRST_NAMES).to_ascii_lowercase(),
                pick(&mut rng, LAST_NAMES).to_ascii_lowercase(),
                rng.gen_range(1..100)
            ),
            "email" | "safeemail" => format!(
                "{}.{}@{}",
                pick(&mut rng, FIRST_NAMES).to_ascii_lowercase(),
                pick(&mut rng, LAST_NAMES).to_ascii_lowercase(),
                pick(&mut rng, SAFE_DOMAINS)
            ),
            "streetaddress" => format!(
                "{} {}",
                rng.gen_range(1..200),
                pick(&mut rng, STREET_NAMES)
            ),
            "city" => pick(&mut rng, CITIES),
            "postcode" => fill_pattern(&mut rng, "#####"),
            "country" => pick(&mut rng, COUNTRIES),
            "address" => format!(
                "{} {}, {} {}",
                rng.gen_range(1..200),
                pick(&mut rng, STREET_NAMES),
                fill_pattern(&mut rng, "#####"),
                pick(&mut rng, CITIES)
            ),
            "phonenumber" => fill_pattern(&mut rng, "+## ### #######"),
            "company" => pick(&mut rng, COMPANIES),
            "word" => pick(&mut rng, WORDS),
            "sentence" => {
                let count = 6 + rng.gen_range(0..6);
                let mut words: Vec<&str> = (0..count)
                    .map(|_| *choose(&mut rng, WORDS))
                    .collect();
                let first = words.remove(0);
                let mut sentence = capitalize(first);
                for word in words {
                    sentence.push(' ');
                    sentence.push_str(word);
                }
                sentence.push('.');
                sentence
            }
            "text" => {
                let sentences = 3;
                let mut out = String::new();
                for i in 0..sentences {
                    if i > 0 {
                        out.push(' ');
                    }
                    let count = 6 + rng.gen_range(0..6);
                    let mut words: Vec<&str> =
                        (0..count).map(|_| *choose(&mut rng, WORDS)).collect();
                    let first = words.remove(0);
                    out.push_str(&capitalize(first));
                    for word in words {
                        out.push(' ');
                        out.push_str(word);
                    }
                    out.push('.');
                }
                out
            }
            "uuid" => Uuid::new_v4().to_string(),
            "numerify" => fill_pattern(&mut rng, args.first().map(String::as_str).unwrap_or("###")),
            "lexify" => fill_pattern(&mut rng, args.first().map(String::as_str).unwrap_or("????")),
            "bothify" => fill_pattern(&mut rng, args.first().map(String::as_str).unwrap_or("##??")),
            "numberbetween" => {
                let min = parse_bound(reference, args.first(), 0)?;
                let max = parse_bound(reference, args.get(1), i64::MAX)?;
                if min > max {
                    return Err(DumpError::Generator(format!(
                        "numberBetween bounds are inverted in '{}'",
                        reference.raw
                    )));
                }
                rng.gen_range(min..=max).to_string()
            }
            _ => return Err(DumpError::UnknownGenerator(reference.raw.clone())),
        };

        Ok(value)
    }
}

impl Default for BuiltinGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueGenerator for BuiltinGenerator {
    fn validate(&self, reference: &GeneratorRef) -> Result<()> {
        match reference.modifier.as_deref() {
            None | Some("unique") => {}
            Some(_) => return Err(DumpError::UnknownGenerator(reference.raw.clone())),
        }

        match normalize(&reference.method).as_str() {
            "firstname" | "lastname" | "name" | "username" | "email" | "safeemail"
            | "streetaddress" | "city" | "postcode" | "country" | "address" | "phonenumber"
            | "company" | "word" | "sentence" | "text" | "uuid" | "numerify" | "lexify"
            | "bothify" => Ok(()),
            "numberbetween" => {
                parse_bound(reference, reference.args.first(), 0)?;
                parse_bound(reference, reference.args.get(1), i64::MAX)?;
                Ok(())
            }
            _ => Err(DumpError::UnknownGenerator(reference.raw.clone())),
        }
    }

    fn generate(&self, reference: &GeneratorRef) -> Result<String> {
        if reference.modifier.as_deref() != Some("unique") {
            return self.generate_once(reference);
        }

        let mut issued = self
            .issued
            .lock()
            .map_err(|_| DumpError::Generator("uniqueness state poisoned".into()))?;
        let seen = issued.entry(reference.method.clone()).or_default();

        for _ in 0..MAX_UNIQUE_RETRIES {
            let candidate = self.generate_once(reference)?;
            if seen.insert(candidate.clone()) {
                return Ok(candidate);
            }
        }

        Err(DumpError::Generator(format!(
            "could not produce a new unique value for '{}'",
            reference.raw
        )))
    }
}

fn normalize(method: &str) -> String {
    method.to_ascii_lowercase().replace('_', "")
}

fn pick(rng: &mut impl Rng, list: &[&str]) -> String {
    (*choose(rng, list)).to_string()
}

fn choose<'a>(rng: &mut impl Rng, list: &'a [&'a str]) -> &'a &'a str {
    // All lists are non-empty constants.
    list.choose(rng).unwrap_or(&list[0])
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Expand a faker-style pattern: `#` becomes a digit, `?` a letter.
fn fill_pattern(rng: &mut impl Rng, pattern: &str) -> String {
    pattern
        .chars()
        .map(|c| match c {
            '#' => char::from(b'0' + rng.gen_range(0..10u8)),
            '?' => char::from(b'a' + rng.gen_range(0..26u8)),
            other => other,
        })
        .collect()
}

fn parse_bound(reference: &GeneratorRef, arg: Option<&String>, default: i64) -> Result<i64> {
    match arg {
        None => Ok(default),
        Some(raw) => raw.parse::<i64>().map_err(|_| {
            DumpError::Generator(format!(
                "'{}' is not a numeric bound in '{}'",
                raw, reference.raw
            ))
        }),
    }
}
