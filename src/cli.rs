use clap::{Parser, Subcommand, ValueEnum};

#[derive(ValueEnum, Debug, Clone)]
pub enum LprFormat {
    Json,
    Text,
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct LprArgs {
    #[clap(subcommand)]
    pub command: LprCommand,
}

#[derive(Subcommand, Debug)]
pub enum LprCommand {
    /// Decode province and vehicle type from a plate string
    Decode {
        plate: String,

        #[clap(long, value_enum, default_value_t = LprFormat::Json)]
        format: LprFormat,
    },

    /// Contrast-normalize and geometrically rectify a plate crop
    Rectify {
        file_path: String,

        /// Output image path
        #[clap(short, long)]
        out: String,

        /// Four corner points "x1,y1,x2,y2,x3,y3,x4,y4"; perspective
        /// correction is used instead of deskew when given
        #[clap(long)]
        corners: Option<String>,

        /// Deskew angle-correction branch
        #[clap(long)]
        flip: bool,

        /// Add a half turn after angle correction
        #[clap(long)]
        rotate: bool,
    },
}
