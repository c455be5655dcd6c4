pub mod palette;
pub mod raster;
pub mod renderer;
pub mod scene;

pub use palette::{Color, Palette};
pub use renderer::{RenderSettings, RenderedSymbol, SymbolRenderer, SymbolTier};
pub use scene::{Scene, Shape};
