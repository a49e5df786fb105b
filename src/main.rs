mod config;
mod dom;
mod logout;
mod modal;
mod page;
mod popup;
mod session;

fn main() {
    page::start();
}
