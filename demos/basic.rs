use sticker_palette::Colors;

fn main() {
    let paths: Vec<String> = std::env::args().skip(1).collect();

    let colors = Colors::from_paths(&paths).unwrap();

    for ((r, g, b), weight) in colors.rgb_colors().into_iter().zip(colors.weights()) {
        println!("#{r:02x}{g:02x}{b:02x} x{weight}");
    }
}
