use sticker_palette::{
    Colors, DEFAULT_KMEANS_MAX_ITER, DEFAULT_KMEANS_RUNS, DEFAULT_K_CLUSTERS,
    DEFAULT_SATURATION_THRESHOLD, DEFAULT_TRANSPARENCY_THRESHOLD, DEFAULT_VALUE_THRESHOLD,
};

fn main() {
    let paths: Vec<String> = std::env::args().skip(1).collect();

    let palette = Colors::from_paths(&paths)
        .unwrap()
        .filter_transparency(DEFAULT_TRANSPARENCY_THRESHOLD)
        .run_kmeans(DEFAULT_K_CLUSTERS, DEFAULT_KMEANS_RUNS, DEFAULT_KMEANS_MAX_ITER)
        .unwrap()
        .filter_saturation(DEFAULT_SATURATION_THRESHOLD)
        .unwrap()
        .filter_value(DEFAULT_VALUE_THRESHOLD)
        .unwrap();

    for (r, g, b) in palette.rgb_colors() {
        println!("#{r:02x}{g:02x}{b:02x}");
    }

    // save a strip preview of the final palette next to the stickers
    let strip = palette.render(1024, 128).unwrap();
    strip.save("palette.png").unwrap();
}
