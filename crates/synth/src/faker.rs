//! Fake field values
//!
//! Small helpers over any `rand::Rng`, so every value is reproducible from the
//! generator's seed.

use chrono::{DateTime, Duration, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;
use uuid::Uuid;

const FIRST_NAMES: &[&str] = &[
    "Aidar", "Aigerim", "Alikhan", "Amina", "Arman", "Asel", "Bauyrzhan", "Dana", "Daniyar",
    "Dinara", "Erlan", "Gulnara", "Kairat", "Madina", "Nurlan", "Saule", "Timur", "Zarina",
];

const LAST_NAMES: &[&str] = &[
    "Abenov", "Akhmetov", "Baimukhanov", "Dzhaksybekov", "Ermekov", "Iskakov", "Kassymov",
    "Mukanov", "Nurpeisov", "Omarov", "Sadykov", "Seitkali", "Tokayev", "Zhumabayev",
];

const MIDDLE_NAMES: &[&str] = &[
    "Aidarovich", "Armanovna", "Bolatovich", "Erlanovna", "Kairatovich", "Maratovna",
    "Nurlanovich", "Serikovna", "Talgatovich",
];

const JOB_TITLES: &[&str] = &[
    "Accountant", "Architect", "Consultant", "Developer", "Driver", "Engineer", "Manager",
    "Nurse", "Sales Associate", "Supervisor", "Teacher", "Technician",
];

const STREETS: &[&str] = &[
    "Abay Ave", "Al-Farabi Ave", "Dostyk Ave", "Furmanov St", "Gogol St", "Raiymbek Ave",
    "Satpayev St", "Tole Bi St", "Zheltoksan St",
];

const CITIES: &[&str] = &["Almaty", "Astana", "Karaganda", "Shymkent", "Aktobe"];

const EMAIL_DOMAINS: &[&str] = &["example.com", "mail.kz", "inbox.test"];

/// Pick one value from a non-empty static list
pub fn pick<'a, R: Rng + ?Sized>(rng: &mut R, values: &[&'a str]) -> &'a str {
    values.choose(rng).copied().unwrap_or_default()
}

/// Random UUID drawn from `rng`
pub fn uuid<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.random()).into_uuid()
}

pub fn first_name<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    pick(rng, FIRST_NAMES)
}

pub fn last_name<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    pick(rng, LAST_NAMES)
}

pub fn middle_name<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    pick(rng, MIDDLE_NAMES)
}

/// "Last First Middle"
pub fn full_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{} {} {}",
        last_name(rng),
        first_name(rng),
        middle_name(rng)
    )
}

pub fn job_title<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    pick(rng, JOB_TITLES)
}

pub fn gender<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    if rng.random_bool(0.5) {
        "male"
    } else {
        "female"
    }
}

pub fn address<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{} {}, {}",
        rng.random_range(1..=300),
        pick(rng, STREETS),
        pick(rng, CITIES)
    )
}

pub fn email<R: Rng + ?Sized>(rng: &mut R, first: &str, last: &str) -> String {
    format!(
        "{}.{}{}@{}",
        first.to_lowercase(),
        last.to_lowercase(),
        rng.random_range(1..100),
        pick(rng, EMAIL_DOMAINS)
    )
}

/// Kazakhstan mobile number, e.g. `+7 (701) 123-45-67`
pub fn phone<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "+7 (7{:02}) {:03}-{:02}-{:02}",
        rng.random_range(0..100),
        rng.random_range(0..1000),
        rng.random_range(0..100),
        rng.random_range(0..100)
    )
}

/// Document number in `NNN-NN-NNNN` form
pub fn ssn<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{:03}-{:02}-{:04}",
        rng.random_range(1..1000),
        rng.random_range(1..100),
        rng.random_range(1..10_000)
    )
}

pub fn ipv4<R: Rng + ?Sized>(rng: &mut R) -> String {
    let octets: [u8; 4] = rng.random();
    format!("{}.{}.{}.{}", octets[0], octets[1], octets[2], octets[3])
}

/// Three-digit code (CVV / MCC style)
pub fn three_digits<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{:03}", rng.random_range(0..1000))
}

/// 16-digit card number with a valid Luhn check digit
pub fn card_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut digits: Vec<u32> = Vec::with_capacity(16);
    digits.push(4);
    for _ in 0..14 {
        digits.push(rng.random_range(0..10));
    }
    digits.push(luhn_check_digit(&digits));
    digits
        .iter()
        .filter_map(|d| char::from_digit(*d, 10))
        .collect()
}

fn luhn_check_digit(payload: &[u32]) -> u32 {
    let sum: u32 = payload
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 0 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    (10 - (sum % 10)) % 10
}

/// Random instant within the last ten years
pub fn past_date<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::seconds(rng.random_range(86_400..315_360_000))
}

/// Random instant within the next ten years
pub fn future_date<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::seconds(rng.random_range(86_400..315_360_000))
}

/// Random instant within twenty years either side of `now`
pub fn any_date<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::seconds(rng.random_range(-630_720_000..630_720_000))
}
