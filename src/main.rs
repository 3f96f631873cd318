fn main() {
    phalanx::run();
}
