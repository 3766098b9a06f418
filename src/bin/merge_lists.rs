use anyhow::Result;
use clap::Parser;
use classic_containers::slist::{list_back, list_front, list_insert_first, list_insert_last, merge_lists};
use classic_containers::SimpleList;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Builds two random ascending lists and merges them into one list of
/// unique values.
#[derive(Parser, Debug)]
#[command(name = "merge_lists")]
struct Args {
    /// Number of values in each list
    #[arg(short, long, default_value_t = 15)]
    length: usize,

    /// Seed for reproducible lists
    #[arg(long)]
    seed: Option<u64>,
}

/// Starts from 50 and keeps values that extend either end, so the list
/// stays ascending.
fn random_sorted_list<R: Rng>(rng: &mut R, length: usize) -> Result<SimpleList<u32>> {
    let mut list = SimpleList::new();
    if length == 0 {
        return Ok(list);
    }
    list_insert_first(&mut list, 50);

    let mut size = 1;
    while size < length {
        let value = rng.gen_range(0..100);
        if value <= *list_front(&list)? {
            list_insert_first(&mut list, value);
        } else if value >= *list_back(&list)? {
            list_insert_last(&mut list, value);
        } else {
            continue;
        }
        size += 1;
    }
    Ok(list)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let first = random_sorted_list(&mut rng, args.length)?;
    let second = random_sorted_list(&mut rng, args.length)?;

    println!();
    println!("First list: {first}");
    println!();
    println!("Second list: {second}");
    println!();
    println!("Merged lists: {}", merge_lists(&first, &second));
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use classic_containers::slist::{list_is_empty, list_size};

    #[test]
    fn test_zero_length_list_is_empty() {
        let list = random_sorted_list(&mut StdRng::seed_from_u64(9), 0).unwrap();
        assert!(list_is_empty(&list));
    }

    #[test]
    fn test_random_list_is_ascending_with_requested_length() {
        let mut rng = StdRng::seed_from_u64(9);
        for length in [1, 2, 15] {
            let list = random_sorted_list(&mut rng, length).unwrap();
            assert_eq!(list_size(&list), length);

            let values: Vec<u32> = list.iter().copied().collect();
            assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
            assert!(values.contains(&50));
        }
    }
}
