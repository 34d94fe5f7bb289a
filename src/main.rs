fn main() {
    marquee_lib::run()
}
