pub mod hex_0x_bytes;
