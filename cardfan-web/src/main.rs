#[macroquad::main("Cardfan")]
async fn main() {
    cardfan_web_lib::run().await;
}
