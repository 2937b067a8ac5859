fn main() {
    if let Err(err) = force_plot_renderer::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
