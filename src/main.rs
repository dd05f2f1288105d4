fn main() {
    depsort::cli::run();
}
