//! Lottery rules and the interactive session built on [`Container`].

use std::fmt;
use std::io::{self, BufRead, Write};

use colored::Colorize;
use rand::Rng;
use thiserror::Error;

use crate::config::{LotteryConfig, PrizeTable};
use crate::container::Container;

// =============================================================================
// Milestone 1: Drawing and scoring
// =============================================================================

/// Draws `config.picks` unique digits from `0..=config.max_digit`, in draw
/// order.
pub fn draw<R: Rng + ?Sized>(rng: &mut R, config: &LotteryConfig) -> Container<u8> {
    let picks = config.picks.min(usize::from(config.max_digit) + 1);
    let mut drawn = Container::with_capacity(picks);

    while drawn.len() < picks {
        let digit = rng.gen_range(0..=config.max_digit);
        if !drawn.contains(&digit) {
            drawn.push_back(digit);
        }
    }

    log::debug!("drew {drawn}");
    drawn
}

/// Counts the picks that appear anywhere in the draw.
pub fn count_matches(drawn: &Container<u8>, picks: &Container<u8>) -> usize {
    picks.iter().filter(|digit| drawn.contains(digit)).count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prize {
    /// Every digit matched in the drawn order.
    Exact(u64),
    /// Every digit matched in some other order.
    Unordered(u64),
    PerDigit { matches: usize, amount: u64 },
}

impl Prize {
    pub fn amount(&self) -> u64 {
        match *self {
            Prize::Exact(amount) | Prize::Unordered(amount) => amount,
            Prize::PerDigit { amount, .. } => amount,
        }
    }
}

impl fmt::Display for Prize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prize::Exact(_) => write!(f, "Jackpot! Every digit in the right order"),
            Prize::Unordered(_) => write!(f, "Every digit, just not in order"),
            Prize::PerDigit { matches, .. } => write!(f, "{matches} matching digit(s)"),
        }
    }
}

pub fn prize(drawn: &Container<u8>, picks: &Container<u8>, table: &PrizeTable) -> Prize {
    if drawn == picks {
        return Prize::Exact(table.exact);
    }

    let matches = count_matches(drawn, picks);
    if matches == drawn.len() {
        Prize::Unordered(table.unordered)
    } else {
        Prize::PerDigit {
            matches,
            amount: table.per_digit.saturating_mul(matches as u64),
        }
    }
}

// =============================================================================
// Milestone 2: Parsing the player's picks
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PickError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("expected {expected} digits, got {found}")]
    WrongCount { expected: usize, found: usize },

    #[error("{digit} is outside 0..={max}")]
    OutOfRange { digit: i64, max: u8 },

    #[error("{0} was picked more than once")]
    Duplicate(u8),
}

/// Parses one line of whitespace separated digits.
pub fn parse_picks(line: &str, config: &LotteryConfig) -> Result<Container<u8>, PickError> {
    let mut picks = Container::with_capacity(config.picks);

    for token in line.split_whitespace() {
        let value: i64 = token
            .parse()
            .map_err(|_| PickError::NotANumber(token.to_string()))?;
        let digit = u8::try_from(value)
            .ok()
            .filter(|digit| *digit <= config.max_digit)
            .ok_or(PickError::OutOfRange {
                digit: value,
                max: config.max_digit,
            })?;
        if picks.contains(&digit) {
            return Err(PickError::Duplicate(digit));
        }
        picks.push_back(digit);
    }

    if picks.len() != config.picks {
        return Err(PickError::WrongCount {
            expected: config.picks,
            found: picks.len(),
        });
    }
    Ok(picks)
}

// =============================================================================
// Milestone 3: Console session
// =============================================================================

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Prompts until a valid set of picks is entered. `None` means the input
/// ended.
fn read_picks<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    config: &LotteryConfig,
) -> io::Result<Option<Container<u8>>> {
    loop {
        write!(
            output,
            "Enter {} unique lottery digits between 0 and {}: ",
            config.picks, config.max_digit
        )?;
        output.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        match parse_picks(&line, config) {
            Ok(picks) => return Ok(Some(picks)),
            Err(err) => {
                log::warn!("rejected picks {:?}: {err}", line.trim());
                writeln!(output, "Invalid picks: {err}. Try again.")?;
            }
        }
    }
}

/// Plays rounds until the player answers anything other than `yes`, or the
/// input ends.
pub fn run_session<R, W, G>(
    input: &mut R,
    output: &mut W,
    rng: &mut G,
    config: &LotteryConfig,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    loop {
        let drawn = draw(rng, config);
        let Some(picks) = read_picks(input, output, config)? else {
            break;
        };

        let matches = count_matches(&drawn, &picks);
        let prize = prize(&drawn, &picks, &config.prizes);

        writeln!(output)?;
        writeln!(output, "Congratulations! You matched {matches} digits!")?;
        writeln!(output, "{prize}")?;
        writeln!(
            output,
            "{}",
            format!("Your prize is ${}", prize.amount()).green().bold()
        )?;
        writeln!(output)?;
        writeln!(output, "Winning numbers: {drawn}")?;
        writeln!(output, "Your picks:      {picks}")?;
        writeln!(output)?;
        write!(output, "Play again (yes/no)? ")?;
        output.flush()?;

        let answer = read_line(input)?;
        writeln!(output)?;
        if answer.as_deref().map(str::trim) != Some("yes") {
            break;
        }
    }

    writeln!(output, "Good luck!")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config() -> LotteryConfig {
        LotteryConfig::default()
    }

    #[test]
    fn test_draw_is_unique_and_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let drawn = draw(&mut rng, &config());
            assert_eq!(drawn.len(), 5);
            assert!(drawn.iter().all(|digit| *digit <= 9));
            assert_eq!(drawn.iter().unique().count(), 5);
        }
    }

    #[test]
    fn test_draw_can_use_every_digit() {
        let config = LotteryConfig {
            picks: 10,
            ..config()
        };
        let drawn = draw(&mut StdRng::seed_from_u64(1), &config);
        assert_eq!(drawn.iter().copied().sorted().collect::<Vec<_>>(), (0..=9).collect::<Vec<_>>());
    }

    #[test]
    fn test_prize_tiers() {
        let table = PrizeTable::default();
        let drawn = Container::from([1, 2, 3, 4, 5]);

        assert_eq!(prize(&drawn, &Container::from([1, 2, 3, 4, 5]), &table), Prize::Exact(10_000));
        assert_eq!(prize(&drawn, &Container::from([5, 4, 3, 2, 1]), &table), Prize::Unordered(3_000));

        let partial = prize(&drawn, &Container::from([1, 2, 7, 8, 9]), &table);
        assert_eq!(partial, Prize::PerDigit { matches: 2, amount: 250 });
        assert_eq!(partial.amount(), 250);

        let none = prize(&drawn, &Container::from([0, 6, 7, 8, 9]), &table);
        assert_eq!(none.amount(), 0);
    }

    #[test]
    fn test_per_digit_payout_saturates() {
        let table = PrizeTable {
            per_digit: u64::MAX,
            ..PrizeTable::default()
        };
        let drawn = Container::from([1, 2, 3, 4, 5]);
        let partial = prize(&drawn, &Container::from([1, 2, 7, 8, 9]), &table);
        assert_eq!(partial, Prize::PerDigit { matches: 2, amount: u64::MAX });
    }

    #[test]
    fn test_parse_picks() {
        let config = config();
        assert_eq!(parse_picks("1 2 3 4 5\n", &config), Ok(Container::from([1, 2, 3, 4, 5])));
        assert_eq!(
            parse_picks("1 2 3", &config),
            Err(PickError::WrongCount { expected: 5, found: 3 })
        );
        assert_eq!(
            parse_picks("1 2 3 4 10", &config),
            Err(PickError::OutOfRange { digit: 10, max: 9 })
        );
        assert_eq!(
            parse_picks("-1 2 3 4 5", &config),
            Err(PickError::OutOfRange { digit: -1, max: 9 })
        );
        assert_eq!(parse_picks("1 1 3 4 5", &config), Err(PickError::Duplicate(1)));
        assert_eq!(
            parse_picks("1 two 3 4 5", &config),
            Err(PickError::NotANumber("two".to_string()))
        );
    }

    #[test]
    fn test_session_exact_match() {
        let config = config();
        let expected = draw(&mut StdRng::seed_from_u64(7), &config);
        let line = expected.iter().join(" ");

        let input = format!("{line}\nno\n");
        let mut output = Vec::new();
        run_session(
            &mut input.as_bytes(),
            &mut output,
            &mut StdRng::seed_from_u64(7),
            &config,
        )
        .unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Enter 5 unique lottery digits between 0 and 9: "));
        assert!(output.contains("You matched 5 digits!"));
        assert!(output.contains("Your prize is $10000"));
        assert!(output.contains(&format!("Winning numbers: {expected}")));
        assert!(output.contains(&format!("Your picks:      {expected}")));
        assert!(output.trim_end().ends_with("Good luck!"));
    }

    #[test]
    fn test_session_reprompts_and_replays() {
        let config = LotteryConfig {
            picks: 1,
            max_digit: 0,
            ..config()
        };
        let input = "5\n0\nyes\n0\nno\n";
        let mut output = Vec::new();
        run_session(
            &mut input.as_bytes(),
            &mut output,
            &mut StdRng::seed_from_u64(3),
            &config,
        )
        .unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.matches("Invalid picks: 5 is outside 0..=0").count(), 1);
        assert_eq!(output.matches("Play again (yes/no)? ").count(), 2);
        assert_eq!(output.matches("Your prize is $10000").count(), 2);
        assert!(output.contains("Good luck!"));
    }

    #[test]
    fn test_session_stops_at_end_of_input() {
        let mut output = Vec::new();
        run_session(
            &mut "".as_bytes(),
            &mut output,
            &mut StdRng::seed_from_u64(3),
            &config(),
        )
        .unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.ends_with("Good luck!\n"));
        assert!(!output.contains("Congratulations"));
    }
}
