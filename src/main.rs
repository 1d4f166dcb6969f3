fn main() {
    pollster::block_on(hotspot_globe::run());
}
