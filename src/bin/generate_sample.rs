//! Writes a synthetic `data/movies_cleaned.csv` and `data/null_report.csv`
//! so the dashboard has something to show out of the box.

use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const GENRES: [&str; 8] = [
    "Action", "Comedy", "Drama", "Horror", "Animation", "Crime", "Adventure", "Biography",
];
const COUNTRIES: [&str; 6] = [
    "United States",
    "United Kingdom",
    "France",
    "Spain",
    "South Korea",
    "Japan",
];
const COMPANIES: [&str; 6] = [
    "Universal Pictures",
    "Paramount Pictures",
    "Warner Bros.",
    "Columbia Pictures",
    "New Line Cinema",
    "Miramax",
];
const RATINGS: [&str; 4] = ["G", "PG", "PG-13", "R"];
const FIRST_WORDS: [&str; 8] = [
    "Midnight", "Silent", "Broken", "Golden", "Scarlet", "Hidden", "Final", "Electric",
];
const SECOND_WORDS: [&str; 8] = [
    "Horizon", "Empire", "Letters", "Harbor", "Protocol", "Garden", "Summer", "Signal",
];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    std::fs::create_dir_all("data").context("creating data directory")?;

    let path = "data/movies_cleaned.csv";
    let mut writer = csv::Writer::from_path(path).context("creating movie CSV")?;
    writer.write_record([
        "name", "rating", "genre", "year", "released", "score", "votes", "director", "writer",
        "star", "country", "budget", "gross", "company", "runtime",
    ])?;

    let mut rows = 0usize;
    for year in 1980..=2020 {
        // the catalogue grows over time, with a dip in 2020
        let per_year = if year == 2020 { 6 } else { 8 + (year - 1980) / 5 };
        for i in 0..per_year {
            let genre = rng.pick(&GENRES);
            let name = format!(
                "{} {} {}",
                rng.pick(&FIRST_WORDS),
                rng.pick(&SECOND_WORDS),
                1 + i
            );
            let person = |rng: &mut SimpleRng| {
                format!("{} {}", rng.pick(&FIRST_WORDS), rng.pick(&SECOND_WORDS))
            };

            let budget = (rng.gauss(16.5, 1.2)).exp().max(50_000.0);
            let multiplier = (rng.gauss(0.3, 1.0)).exp();
            let gross = budget * multiplier;
            let score = rng.gauss(6.4, 0.9).clamp(1.0, 10.0);
            let votes = (rng.gauss(11.0, 1.5)).exp().max(100.0);
            let runtime = rng.gauss(110.0, 18.0).clamp(60.0, 240.0);

            // leave the occasional hole so the null handling has work to do
            let genre_cell = if rng.next_f64() < 0.02 { "" } else { genre };
            let score_cell = if rng.next_f64() < 0.03 {
                String::new()
            } else {
                format!("{score:.1}")
            };

            let record: Vec<String> = vec![
                name,
                rng.pick(&RATINGS).to_string(),
                genre_cell.to_string(),
                year.to_string(),
                format!("June {}, {year}", 1 + (rng.next_u64() % 28)),
                score_cell,
                format!("{votes:.0}"),
                person(&mut rng),
                person(&mut rng),
                person(&mut rng),
                rng.pick(&COUNTRIES).to_string(),
                format!("{budget:.0}"),
                format!("{gross:.0}"),
                rng.pick(&COMPANIES).to_string(),
                format!("{runtime:.0}"),
            ];
            writer.write_record(&record)?;
            rows += 1;
        }
    }
    writer.flush()?;
    println!("Wrote {rows} movies to {path}");

    let nulls_path = "data/null_report.csv";
    let mut writer = csv::Writer::from_path(nulls_path).context("creating null report")?;
    writer.write_record(["column", "null_pct"])?;
    for (column, pct) in [
        ("budget", 28.31),
        ("gross", 2.47),
        ("rating", 1.01),
        ("company", 0.22),
        ("runtime", 0.05),
        ("score", 0.04),
        ("votes", 0.04),
        ("writer", 0.04),
        ("star", 0.01),
        ("country", 0.04),
        ("released", 0.03),
        ("name", 0.0),
        ("year", 0.0),
        ("genre", 0.0),
    ] {
        writer.write_record([column.to_string(), pct.to_string()])?;
    }
    writer.flush()?;
    println!("Wrote null report to {nulls_path}");

    Ok(())
}
