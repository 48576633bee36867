use std::process;

mod run;
mod ui;

fn main() {
    let view = match ui::MazeView::new() {
        Ok(view) => view,
        Err(e) => {
            eprintln!("failed to set up the terminal: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run::run(view) {
        eprintln!("viewer error: {}", e);
        process::exit(1);
    }
}
