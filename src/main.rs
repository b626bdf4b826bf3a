use tamarin::repl;

fn main() {
    println!("Hello! This is the Tamarin programming language!");
    println!("Feel free to type in commands");
    repl::start();
}
