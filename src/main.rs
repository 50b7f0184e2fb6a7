fn main() {
    pressure_pipeline::cli::run();
}
