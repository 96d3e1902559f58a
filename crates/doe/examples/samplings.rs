use ndarray::{arr2, array};
use planbox_doe::{
    expand_grid, BoxBehnken, CentralComposite, CodedDesign, DOptimal, FullFactorial, Lhs,
    LhsKind, PlackettBurman, SamplingMethod,
};

fn main() {
    let xlimits = arr2(&[[0., 1.], [-10., 10.], [5., 15.]]);
    let n = 10;

    println!("Take {n} samples in");
    println!("{xlimits}\n");

    println!("*** using centered latin hypercube sampling");
    let samples = Lhs::new(&xlimits).kind(LhsKind::Centered).sample(n);
    println!("{samples}\n");

    println!("*** using centered maximin latin hypercube sampling");
    let samples = Lhs::new(&xlimits).kind(LhsKind::CenteredMaximin).sample(n);
    println!("{samples}\n");

    println!("*** full factorial level indices for 2 x 3 x 2 levels");
    println!("{}\n", FullFactorial::new(&[2, 3, 2]).unwrap().coded());

    println!("*** Plackett-Burman screening of 5 factors");
    println!("{}\n", PlackettBurman::new(5).unwrap().coded());

    println!("*** face-centered central composite design of 3 factors");
    println!("{}\n", CentralComposite::new(3).unwrap().coded());

    println!("*** Box-Behnken design of 3 factors");
    println!("{}\n", BoxBehnken::new(3).unwrap().coded());

    println!("*** D-optimal 6-run subset of a 3 x 3 x 2 grid");
    let candidates =
        expand_grid(&[array![0., 0.5, 1.], array![1., 10., 100.], array![5., 15.]]).unwrap();
    println!("{}", DOptimal::new(&candidates, 6).unwrap().sample().unwrap());
}
