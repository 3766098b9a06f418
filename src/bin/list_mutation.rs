use anyhow::Result;
use classic_containers::DList;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut integers = DList::from([0, 1, 2, 3, 4, 5]);
    if integers.is_empty() {
        println!("is empty");
    }
    integers.cursor_front_mut().erase()?;
    integers.cursor_end_mut().insert(6);

    println!("{integers}");
    Ok(())
}
