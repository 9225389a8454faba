#[cfg(test)]
mod fakes;
#[cfg(test)]
mod pipeline;
