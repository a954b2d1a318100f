pub(super) struct SeedPost {
    pub id: u32,
    pub title: &'static str,
    pub summary: &'static str,
    pub content: &'static str,
    pub next: Option<u32>,
}

pub(super) static SEED: [SeedPost; 8] = [
    SeedPost {
        id: 1,
        title: "Getting Started with React",
        summary: "Learn how to build reusable UI pieces, the fundamental building blocks of React.",
        content: r#"The absolute core of React is the **component**. You can think of a component as a custom, reusable HTML element that has its own logic and appearance. Everything you see in a React app is a component!

Here is a basic functional component:
```jsx
function Welcome(props) {
  return <h1>Hello, {props.name}</h1>;
}
```
This component accepts "props" (properties) and returns a React element that describes what should appear on the screen.

But what if a component needs to remember information and change over time, like a counter? For that, you need to manage its "state".

**Next up:** We'll learn about React Hooks, specifically `useState`, to give our components memory."#,
        next: Some(2),
    },
    SeedPost {
        id: 2,
        title: "Understanding Hooks: useState & useEffect",
        summary: "Give your components memory and superpowers with state and lifecycle hooks.",
        content: r#"Hooks are special functions that let you "hook into" React features from your functional components. The most important hook is `useState`.

**useState: Giving Components State**
`useState` allows a component to hold on to information (its "state") between renders. It returns the current state value and a function to update it.

Here's a simple counter:
```jsx
import React, { useState } from 'react';

function Counter() {
  const [count, setCount] = useState(0);

  return (
    <div>
      <p>You clicked {count} times</p>
      <button onClick={() => setCount(count + 1)}>
        Click me
      </button>
    </div>
  );
}
```
Now your component has its own memory!

**useEffect: Handling Side Effects**
What if you need to do something *after* React has updated the DOM, like fetching data from an API? That's a "side effect," and for that, we use `useEffect`.

**Next up:** We'll explore how `react-router-dom` allows us to navigate between different pages."#,
        next: Some(3),
    },
    SeedPost {
        id: 3,
        title: "React Router for Navigation",
        summary: "Connect your components together to create a seamless, multi-page application experience.",
        content: r#"Real applications have multiple pages (e.g., Home, About, Profile). `react-router-dom` is the standard library for handling this navigation without reloading the entire page.

The main components are:
- **<BrowserRouter>**: Wraps your entire app to enable routing.
- **<Routes>**: A container for all your individual routes.
- **<Route>**: Defines a single page route.
- **<Link>**: Used instead of an `<a>` tag for navigation.

Here's a basic setup in your `App.jsx`:
```jsx
import { Routes, Route } from 'react-router-dom';
import HomePage from './pages/HomePage';
import AboutPage from './pages/AboutPage';

function App() {
  return (
    <Routes>
      <Route path="/" element={<HomePage />} />
      <Route path="/about" element={<AboutPage />} />
    </Routes>
  );
}
```
You've now learned the core trifecta of modern React: **Components, Hooks, and Routing**.

**Next up:** We'll add search and sort functionality to our homepage."#,
        next: Some(4),
    },
    SeedPost {
        id: 4,
        title: "Bonus: Adding Search and Sort",
        summary: "Learn how we made the homepage interactive with client-side filtering and sorting.",
        content: r#"A static list of posts is good, but a dynamic one is better! We made the homepage more useful by adding search and sort functionality.

**The State Management**
We needed three pieces of state to make this work:
```jsx
const [posts, setPosts] = useState([]);
const [searchTerm, setSearchTerm] = useState("");
const [sortOrder, setSortOrder] = useState("default");
```

**The Logic**
Start with a copy of the original posts, apply the search filter first, then sort the filtered results, and finally publish the list that is actually displayed.

**Next up:** We'll see how to handle user input with forms by building a newsletter signup page."#,
        next: Some(5),
    },
    SeedPost {
        id: 5,
        title: "Handling Forms and User Input",
        summary: "Explore how to manage form state and handle submissions, a core skill in web development.",
        content: r#"Nearly every web app needs to handle user input through forms. We built a Newsletter page to demonstrate this fundamental concept.

**Controlled Components**
The standard React way to handle forms is with "controlled components". The form input's value is tied directly to a state variable.
```jsx
const [email, setEmail] = useState('');

<input
  type="email"
  value={email}
  onChange={(e) => setEmail(e.target.value)}
/>
```

**Handling Submission**
We attach an `onSubmit` handler to the `<form>` tag, call `event.preventDefault()` and read the `email` state.

**Next up:** We'll explore an advanced topic: performance optimization with custom hooks."#,
        next: Some(6),
    },
    SeedPost {
        id: 6,
        title: "Advanced: Custom Hooks & Performance",
        summary: "Optimize user input by creating a custom `useDebounce` hook for better performance.",
        content: r#"Our search feature worked, but it filtered the list on every single keystroke. We can optimize this with a technique called **debouncing**.

**Debouncing**
Debouncing means we wait for the user to stop typing for a short period (e.g., 300ms) before we run our filtering logic.

**Custom Hooks**
```jsx
function useDebounce(value, delay) {
  const [debouncedValue, setDebouncedValue] = useState(value);

  useEffect(() => {
    const handler = setTimeout(() => {
      setDebouncedValue(value);
    }, delay);

    return () => clearTimeout(handler);
  }, [value, delay]);

  return debouncedValue;
}
```
We then use this hook in our `HomePage` to get a "delayed" version of the search term, and use that for filtering.

**Next up:** Performance optimization with memoization."#,
        next: Some(7),
    },
    SeedPost {
        id: 7,
        title: "Advanced: Performance Optimization",
        summary: "Learn to prevent unnecessary re-renders and calculations with `useMemo` and `React.memo`.",
        content: r#"As an application grows, performance becomes critical. React provides powerful hooks to prevent wasted work.

**Memoizing Calculations with `useMemo`**
```jsx
const filteredPosts = useMemo(() => {
  return processedPosts;
}, [debouncedSearchTerm, posts, sortOrder]);
```

**Memoizing Components with `React.memo`**
Wrapping a component in `React.memo` skips re-rendering when its props haven't changed.

**Memoizing Functions with `useCallback`**
```jsx
const handleAction = useCallback(() => {
}, []);
```

**Next up:** Managing complex, shared state with Redux Toolkit."#,
        next: Some(8),
    },
    SeedPost {
        id: 8,
        title: "Global State with Redux Toolkit",
        summary: "Learn the official, industry-standard way to manage complex, shared application state.",
        content: r#"When an application grows, passing props through many layers becomes difficult. A global state management library like Redux solves this.

**1. `createSlice()`**
```jsx
export const postsSlice = createSlice({
  name: 'posts',
  initialState,
  reducers: {},
});
```

**2. `configureStore()`**
```jsx
export const store = configureStore({
  reducer: {
    posts: postsReducer,
  },
});
```

**Congratulations!** You've completed the learning path."#,
        next: None,
    },
];
