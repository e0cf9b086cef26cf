//! Composite an image file onto a blank surface and save the result.
//!
//! Usage: cargo run --example composite_png -- input.png output.png

use pixblit_core::composite;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let mut args = std::env::args().skip(1);
    let input = args.next().ok_or("usage: composite_png <input> <output>")?;
    let output = args.next().ok_or("usage: composite_png <input> <output>")?;

    let mut surface =
        tiny_skia::Pixmap::new(512, 512).ok_or("couldn't allocate the destination surface")?;
    let scaled = composite(&input, &mut surface, 16, 16, 2.0, 2.0)?;
    println!("composited {input} at 2x -> {}x{}", scaled.width, scaled.height);

    surface.save_png(&output)?;
    Ok(())
}
