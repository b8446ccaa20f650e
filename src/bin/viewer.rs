use imagelab::logging;
use imagelab::ui::viewer::Viewer;

fn main() {
    logging::init();

    if let Err(err) = Viewer::run() {
        eprintln!("An error occurred: {err}");
        std::process::exit(1);
    }
}
