use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    fundbot::cli::main()
}
